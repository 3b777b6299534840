//! Attribute-driven reveal presets
//!
//! Elements opt in with `data-aos="<preset>"`. The visuals live entirely in
//! an injected style sheet: every preset has an initial transform and a
//! revealed transform keyed on the animate class, so revealing an element
//! is a single class write.

use std::fmt::Write as _;

/// Class added to an attribute-driven element when it is revealed
pub const AOS_ANIMATE_CLASS: &str = "aos-animate";

/// Attribute naming the preset
pub const AOS_ATTRIBUTE: &str = "data-aos";

/// Attribute carrying the per-element reveal delay in milliseconds
pub const AOS_DELAY_ATTRIBUTE: &str = "data-aos-delay";

/// Transition applied to every attribute-driven element
pub const AOS_TRANSITION: &str = "opacity 0.8s ease, transform 0.8s ease";

/// Named entry animations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AosPreset {
    FadeUp,
    FadeRight,
    FadeLeft,
    ZoomIn,
    FlipUp,
}

impl AosPreset {
    pub const ALL: [AosPreset; 5] = [
        AosPreset::FadeUp,
        AosPreset::FadeRight,
        AosPreset::FadeLeft,
        AosPreset::ZoomIn,
        AosPreset::FlipUp,
    ];

    /// Attribute value selecting this preset
    pub fn name(self) -> &'static str {
        match self {
            AosPreset::FadeUp => "fade-up",
            AosPreset::FadeRight => "fade-right",
            AosPreset::FadeLeft => "fade-left",
            AosPreset::ZoomIn => "zoom-in",
            AosPreset::FlipUp => "flip-up",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.name() == name.trim())
    }

    /// Transform while hidden
    pub fn initial_transform(self) -> &'static str {
        match self {
            AosPreset::FadeUp => "translateY(50px)",
            AosPreset::FadeRight => "translateX(-50px)",
            AosPreset::FadeLeft => "translateX(50px)",
            AosPreset::ZoomIn => "scale(0.8)",
            AosPreset::FlipUp => "perspective(1000px) rotateX(-90deg)",
        }
    }

    /// Transform once the animate class is present
    pub fn revealed_transform(self) -> &'static str {
        match self {
            AosPreset::FadeUp => "translateY(0)",
            AosPreset::FadeRight | AosPreset::FadeLeft => "translateX(0)",
            AosPreset::ZoomIn => "scale(1)",
            AosPreset::FlipUp => "perspective(1000px) rotateX(0)",
        }
    }
}

/// Build the style sheet backing every preset
///
/// `attribute` is the opt-in attribute, `animate_class` the class the
/// reveal adds, and `transition` the shared transition declaration.
pub fn aos_stylesheet(attribute: &str, animate_class: &str, transition: &str) -> String {
    let mut css = String::new();
    let _ = writeln!(
        css,
        "[{attribute}] {{\n    opacity: 0;\n    transition: {transition};\n}}\n"
    );
    let _ = writeln!(
        css,
        "[{attribute}].{animate_class} {{\n    opacity: 1;\n}}\n"
    );

    for preset in AosPreset::ALL {
        let name = preset.name();
        let _ = writeln!(
            css,
            "[{attribute}=\"{name}\"] {{\n    transform: {};\n}}\n",
            preset.initial_transform()
        );
        let _ = writeln!(
            css,
            "[{attribute}=\"{name}\"].{animate_class} {{\n    transform: {};\n}}\n",
            preset.revealed_transform()
        );
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for preset in AosPreset::ALL {
            assert_eq!(AosPreset::from_name(preset.name()), Some(preset));
        }
        assert_eq!(AosPreset::from_name(" zoom-in "), Some(AosPreset::ZoomIn));
        assert_eq!(AosPreset::from_name("slide-down"), None);
    }

    #[test]
    fn test_stylesheet_covers_every_preset() {
        let css = aos_stylesheet(AOS_ATTRIBUTE, AOS_ANIMATE_CLASS, AOS_TRANSITION);

        assert!(css.contains("[data-aos] {\n    opacity: 0;"));
        assert!(css.contains("transition: opacity 0.8s ease, transform 0.8s ease;"));
        assert!(css.contains("[data-aos].aos-animate {\n    opacity: 1;"));
        assert!(css.contains("[data-aos=\"fade-right\"] {\n    transform: translateX(-50px);"));
        assert!(css.contains(
            "[data-aos=\"flip-up\"].aos-animate {\n    transform: perspective(1000px) rotateX(0);"
        ));
        for preset in AosPreset::ALL {
            assert!(css.contains(preset.initial_transform()));
        }
    }
}
