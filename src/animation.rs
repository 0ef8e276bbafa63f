//! Scroll and hover animations.
//!
//! Pages declare which elements animate; this module turns the declarations
//! into one inline ES module script that drives GSAP and its ScrollTrigger
//! plugin in the browser. Nothing here runs on the server beyond building
//! that script text.
//!
//! Entrance effects play from an offset, transparent state into place when
//! the element scrolls into view, and follow the trigger's toggle actions
//! (`restart pause resume pause`): restart on entering, pause on leaving,
//! resume on re-entering from below, pause on leaving upward. Hover effects
//! scale an element up while the pointer is over it.

use maud::{Markup, PreEscaped, html};
use std::fmt::Write;

/// Trigger window: animation starts when the element's top crosses 85% of
/// the viewport and stops when its bottom passes 25%.
pub const TRIGGER_START: &str = "top 85%";
pub const TRIGGER_END: &str = "bottom 25%";
pub const TOGGLE_ACTIONS: &str = "restart pause resume pause";

pub const ENTRANCE_DURATION: f32 = 0.8;
pub const ENTRANCE_EASE: &str = "sine";
pub const HOVER_SCALE: f32 = 1.2;
pub const HOVER_EASE: &str = "bounce.out";

#[derive(Debug, Clone, PartialEq)]
pub enum Animation {
    /// Slide in horizontally from `x` pixels away.
    SlideInline {
        selector: String,
        x: f32,
        rotation: f32,
    },
    /// Slide in vertically from `y` pixels away.
    SlideInBlock {
        selector: String,
        y: f32,
        rotation: f32,
    },
    /// Scale up while hovered.
    ScaleOnHover { selector: String },
}

impl Animation {
    pub fn slide_inline(selector: &str, x: f32) -> Self {
        Self::SlideInline {
            selector: selector.to_string(),
            x,
            rotation: 0.0,
        }
    }

    pub fn slide_in_block(selector: &str, y: f32) -> Self {
        Self::SlideInBlock {
            selector: selector.to_string(),
            y,
            rotation: 0.0,
        }
    }

    pub fn scale_on_hover(selector: &str) -> Self {
        Self::ScaleOnHover {
            selector: selector.to_string(),
        }
    }

    /// Same animation with a starting rotation in degrees.
    pub fn rotated(self, degrees: f32) -> Self {
        match self {
            Self::SlideInline { selector, x, .. } => Self::SlideInline {
                selector,
                x,
                rotation: degrees,
            },
            Self::SlideInBlock { selector, y, .. } => Self::SlideInBlock {
                selector,
                y,
                rotation: degrees,
            },
            hover => hover,
        }
    }
}

/// Quote a string as a JavaScript string literal.
///
/// JSON string syntax is valid JavaScript. `<` is escaped as well so a
/// selector can never close the surrounding `<script>` element.
fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string())
        .to_string()
        .replace('<', "\\u003c")
}

fn entrance_js(out: &mut String, selector: &str, axis: &str, offset: f32, rotation: f32) {
    let _ = writeln!(
        out,
        "document.querySelectorAll({sel}).forEach((el) => gsap.from(el, {{ duration: {ENTRANCE_DURATION}, {axis}: {offset}, opacity: 0, rotation: {rotation}, transformOrigin: \"50% 50%\", ease: \"{ENTRANCE_EASE}\", scrollTrigger: trigger(el) }}));",
        sel = js_string(selector),
    );
}

/// Build the module script body for a set of animations.
///
/// Returns an empty string when there is nothing to animate, so pages can
/// skip the GSAP download entirely.
pub fn script_source(gsap_base: &str, animations: &[Animation]) -> String {
    if animations.is_empty() {
        return String::new();
    }
    let base = gsap_base.trim_end_matches('/');
    let mut out = String::new();

    let _ = writeln!(out, "import {{ gsap }} from {};", js_string(&format!("{base}/index.js")));
    let _ = writeln!(
        out,
        "import {{ ScrollTrigger }} from {};",
        js_string(&format!("{base}/ScrollTrigger.js"))
    );
    out.push_str("gsap.registerPlugin(ScrollTrigger);\n");
    let _ = writeln!(
        out,
        "const trigger = (el) => ({{ trigger: el, start: \"{TRIGGER_START}\", end: \"{TRIGGER_END}\", toggleActions: \"{TOGGLE_ACTIONS}\" }});"
    );

    let mut hover_selectors = Vec::new();
    for animation in animations {
        match animation {
            Animation::SlideInline {
                selector,
                x,
                rotation,
            } => entrance_js(&mut out, selector, "x", *x, *rotation),
            Animation::SlideInBlock {
                selector,
                y,
                rotation,
            } => entrance_js(&mut out, selector, "y", *y, *rotation),
            Animation::ScaleOnHover { selector } => hover_selectors.push(selector.as_str()),
        }
    }

    if !hover_selectors.is_empty() {
        let _ = writeln!(
            out,
            "const hover = (e) => gsap.to(e.currentTarget, {{ scale: e.type === \"mouseenter\" ? {HOVER_SCALE} : 1, ease: \"{HOVER_EASE}\" }});"
        );
        for selector in hover_selectors {
            let _ = writeln!(
                out,
                "document.querySelectorAll({}).forEach((el) => {{ el.addEventListener(\"mouseenter\", hover); el.addEventListener(\"mouseleave\", hover); }});",
                js_string(selector)
            );
        }
    }
    out
}

/// The `<script type="module">` element for a page, or nothing.
pub fn render_script(gsap_base: &str, animations: &[Animation]) -> Markup {
    let source = script_source(gsap_base, animations);
    html! {
        @if !source.is_empty() {
            script type="module" { (PreEscaped(source)) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://cdn.example/gsap@3/";

    #[test]
    fn no_animations_no_script() {
        assert_eq!(script_source(BASE, &[]), "");
        assert_eq!(render_script(BASE, &[]).into_string(), "");
    }

    #[test]
    fn imports_gsap_and_registers_scroll_trigger() {
        let js = script_source(BASE, &[Animation::slide_inline(".hero", -200.0)]);
        assert!(js.contains(r#"import { gsap } from "https://cdn.example/gsap@3/index.js";"#));
        assert!(js.contains(r#"import { ScrollTrigger } from "https://cdn.example/gsap@3/ScrollTrigger.js";"#));
        assert!(js.contains("gsap.registerPlugin(ScrollTrigger);"));
    }

    #[test]
    fn trigger_window_and_toggle_actions() {
        let js = script_source(BASE, &[Animation::slide_in_block(".card", 100.0)]);
        assert!(js.contains(r#"start: "top 85%""#));
        assert!(js.contains(r#"end: "bottom 25%""#));
        assert!(js.contains(r#"toggleActions: "restart pause resume pause""#));
    }

    #[test]
    fn slide_inline_moves_on_x_axis() {
        let js = script_source(BASE, &[Animation::slide_inline(".hero", -200.0).rotated(-8.0)]);
        assert!(js.contains(r#"document.querySelectorAll(".hero")"#));
        assert!(js.contains("x: -200, opacity: 0, rotation: -8"));
        assert!(js.contains("duration: 0.8"));
        assert!(js.contains(r#"ease: "sine""#));
        assert!(js.contains(r#"transformOrigin: "50% 50%""#));
    }

    #[test]
    fn slide_in_block_moves_on_y_axis() {
        let js = script_source(BASE, &[Animation::slide_in_block(".card", 50.0)]);
        assert!(js.contains("y: 50, opacity: 0, rotation: 0"));
    }

    #[test]
    fn hover_scales_and_resets() {
        let js = script_source(BASE, &[Animation::scale_on_hover(".tech-icon")]);
        assert!(js.contains(r#"e.type === "mouseenter" ? 1.2 : 1"#));
        assert!(js.contains(r#"ease: "bounce.out""#));
        assert!(js.contains(r#"el.addEventListener("mouseenter", hover)"#));
        assert!(js.contains(r#"el.addEventListener("mouseleave", hover)"#));
    }

    #[test]
    fn hover_rotation_is_ignored() {
        let a = Animation::scale_on_hover(".x").rotated(45.0);
        assert_eq!(a, Animation::scale_on_hover(".x"));
    }

    #[test]
    fn selectors_cannot_break_out_of_script() {
        let js = script_source(BASE, &[Animation::scale_on_hover("</script><b>")]);
        assert!(!js.contains("</script>"));
        assert!(js.contains(r"\u003c/script>"));
    }

    #[test]
    fn render_script_wraps_in_module_tag() {
        let html = render_script(BASE, &[Animation::scale_on_hover("a")]).into_string();
        assert!(html.starts_with(r#"<script type="module">"#));
        assert!(html.ends_with("</script>"));
    }
}
