//! The built-in portfolio page.

use folio_api_core::{Property, StyleMap, TargetPath};
use folio_motion::{Ease, EaseMode, Marker, Offset, Position, Repeat, Stagger, Threshold, ToggleActions};

use crate::config::{
    AmbientSpec, ContactConfig, HoverSpec, LoadingConfig, NavigationConfig, PageConfig,
    ScrubSpec, SectionSpec, StepSpec, TriggerSpec,
};

fn path(section: &str, element: &str) -> TargetPath {
    TargetPath::new(vec![section.to_string()], element, None)
}

fn root(id: &str) -> TargetPath {
    TargetPath::new(Vec::new(), id, None)
}

fn power2(mode: EaseMode) -> Ease {
    Ease::Power { degree: 2, mode }
}

fn back_out() -> Ease {
    Ease::Back {
        mode: EaseMode::Out,
        overshoot: 1.7,
    }
}

fn marker(element: f32, viewport: f32) -> Marker {
    Marker::new(Offset::Fraction(element), Offset::Fraction(viewport))
}

fn style(pairs: &[(Property, f32)]) -> StyleMap {
    pairs.iter().map(|(p, v)| (*p, (*v).into())).collect()
}

fn step(target: TargetPath, from: StyleMap, to: StyleMap, duration: f32, ease: Ease) -> StepSpec {
    StepSpec {
        target,
        from: Some(from),
        to,
        duration: Some(duration),
        ease: Some(ease),
        position: Position::Sequential,
        stagger: None,
    }
}

fn to_step(target: TargetPath, to: StyleMap, duration: f32, ease: Option<Ease>) -> StepSpec {
    StepSpec {
        target,
        from: None,
        to,
        duration: Some(duration),
        ease,
        position: Position::Sequential,
        stagger: None,
    }
}

/// Fade in while sliding along `axis` by `offset` and clearing `blur`.
fn blur_in(target: TargetPath, axis: Property, offset: f32, blur: f32, duration: f32) -> StepSpec {
    step(
        target,
        style(&[(Property::Opacity, 0.0), (axis, offset), (Property::Blur, blur)]),
        style(&[(Property::Opacity, 1.0), (axis, 0.0), (Property::Blur, 0.0)]),
        duration,
        power2(EaseMode::Out),
    )
}

/// Pop in from a smaller scale while rising.
fn pop_in(target: TargetPath, scale: f32, rise: f32, duration: f32, ease: Ease) -> StepSpec {
    step(
        target,
        style(&[(Property::Opacity, 0.0), (Property::Scale, scale), (Property::Y, rise)]),
        style(&[(Property::Opacity, 1.0), (Property::Scale, 1.0), (Property::Y, 0.0)]),
        duration,
        ease,
    )
}

fn scroll_trigger(end: Option<Marker>) -> TriggerSpec {
    TriggerSpec::Scroll {
        start: Threshold::Marker(marker(0.0, 0.8)),
        end,
        exit: None,
        toggle_actions: ToggleActions::default(),
    }
}

fn hero() -> SectionSpec {
    let cta = step(
        path("hero", "cta"),
        style(&[(Property::Opacity, 0.0), (Property::Scale, 0.8), (Property::Blur, 5.0)]),
        style(&[(Property::Opacity, 1.0), (Property::Scale, 1.0), (Property::Blur, 0.0)]),
        0.8,
        back_out(),
    );
    let spline = step(
        path("hero", "spline"),
        style(&[(Property::Opacity, 0.0), (Property::X, 100.0), (Property::Scale, 0.9)]),
        style(&[(Property::Opacity, 1.0), (Property::X, 0.0), (Property::Scale, 1.0)]),
        1.5,
        power2(EaseMode::Out),
    );
    SectionSpec {
        id: "hero".into(),
        trigger: TriggerSpec::Immediate,
        delay: 0.5,
        steps: vec![
            blur_in(path("hero", "headline"), Property::Y, 50.0, 10.0, 1.2),
            blur_in(path("hero", "subtitle"), Property::Y, 30.0, 5.0, 1.0).at(Position::Relative(-0.6)),
            cta.at(Position::Relative(-0.4)),
            spline.at(Position::Relative(-1.0)),
        ],
        ambient: vec![
            AmbientSpec {
                group: path("hero", "orb"),
                to: style(&[(Property::Y, -30.0), (Property::X, 20.0)]),
                per_member: style(&[(Property::Y, -10.0), (Property::X, -15.0)]),
                duration: 3.0,
                duration_step: 0.5,
                delay_step: 0.5,
                ease: Some(Ease::Power {
                    degree: 1,
                    mode: EaseMode::InOut,
                }),
                repeat: Repeat::Infinite,
                yoyo: true,
            },
            AmbientSpec {
                group: path("hero", "orb"),
                to: style(&[(Property::Rotation, 360.0)]),
                per_member: StyleMap::new(),
                duration: 8.0,
                duration_step: 2.0,
                delay_step: 0.0,
                ease: Some(Ease::Linear),
                repeat: Repeat::Infinite,
                yoyo: false,
            },
        ],
        hover: Vec::new(),
        scrub: Some(ScrubSpec {
            target: path("hero", "spline"),
            start: marker(0.0, 0.0),
            end: marker(1.0, 0.0),
            property: Property::Y,
            distance: 100.0,
            smoothing: 0.3,
        }),
    }
}

fn about() -> SectionSpec {
    SectionSpec {
        id: "about".into(),
        trigger: scroll_trigger(Some(marker(1.0, 0.2))),
        delay: 0.0,
        steps: vec![
            blur_in(path("about", "image"), Property::X, -50.0, 10.0, 1.0),
            blur_in(path("about", "content"), Property::X, 50.0, 10.0, 1.0).at(Position::Relative(-0.5)),
            pop_in(path("about", "skill-item"), 0.8, 20.0, 0.5, back_out()).staggered(Stagger::Overlap {
                overlap: 0.8,
                decay: 0.1,
            }),
        ],
        ambient: Vec::new(),
        hover: vec![HoverSpec {
            group: path("about", "skill-item"),
            enter: style(&[(Property::Scale, 1.1), (Property::Y, -5.0)]),
            leave: style(&[(Property::Scale, 1.0), (Property::Y, 0.0)]),
            duration: 0.3,
            ease: Some(power2(EaseMode::Out)),
        }],
        scrub: None,
    }
}

fn projects() -> SectionSpec {
    SectionSpec {
        id: "projects".into(),
        trigger: scroll_trigger(Some(marker(1.0, 0.2))),
        delay: 0.0,
        steps: vec![
            blur_in(path("projects", "title"), Property::Y, 50.0, 10.0, 1.0),
            pop_in(path("projects", "card"), 0.9, 30.0, 0.6, power2(EaseMode::Out)).staggered(
                Stagger::Overlap {
                    overlap: 0.8,
                    decay: 0.1,
                },
            ),
        ],
        ambient: Vec::new(),
        hover: Vec::new(),
        scrub: None,
    }
}

fn contact() -> SectionSpec {
    SectionSpec {
        id: "contact".into(),
        trigger: scroll_trigger(Some(marker(1.0, 0.2))),
        delay: 0.0,
        steps: vec![
            blur_in(path("contact", "form-element"), Property::X, -30.0, 5.0, 0.6)
                .staggered(Stagger::Each { interval: 0.1 }),
            pop_in(path("contact", "social-icon"), 0.8, 20.0, 0.5, back_out()).staggered(
                Stagger::Overlap {
                    overlap: 0.6,
                    decay: 0.1,
                },
            ),
        ],
        ambient: Vec::new(),
        hover: Vec::new(),
        scrub: None,
    }
}

fn footer() -> SectionSpec {
    SectionSpec {
        id: "footer".into(),
        trigger: scroll_trigger(None),
        delay: 0.0,
        steps: vec![blur_in(root("footer"), Property::Y, 60.0, 10.0, 1.0)],
        ambient: vec![AmbientSpec {
            group: path("footer", "particle"),
            to: style(&[(Property::Y, -20.0)]),
            per_member: StyleMap::new(),
            duration: 3.0,
            duration_step: 0.5,
            delay_step: 0.2,
            ease: Some(Ease::Power {
                degree: 1,
                mode: EaseMode::InOut,
            }),
            repeat: Repeat::Infinite,
            yoyo: true,
        }],
        hover: Vec::new(),
        scrub: None,
    }
}

fn loading() -> LoadingConfig {
    let logo = path("preloader", "logo");
    LoadingConfig {
        entrance: vec![step(
            logo.clone(),
            style(&[(Property::Opacity, 0.0), (Property::Scale, 0.5), (Property::Blur, 20.0)]),
            style(&[(Property::Opacity, 1.0), (Property::Scale, 1.0), (Property::Blur, 0.0)]),
            1.0,
            power2(EaseMode::Out),
        )],
        exit: vec![
            to_step(path("preloader", "track"), style(&[(Property::Opacity, 0.0)]), 0.5, None),
            to_step(
                logo,
                style(&[(Property::Scale, 0.8), (Property::Opacity, 0.0), (Property::Blur, 10.0)]),
                0.8,
                Some(power2(EaseMode::InOut)),
            )
            .at(Position::Relative(-0.3)),
            to_step(
                root("preloader"),
                style(&[(Property::Opacity, 0.0), (Property::Scale, 1.1)]),
                1.0,
                Some(power2(EaseMode::InOut)),
            )
            .at(Position::Relative(-0.5)),
        ],
        ..LoadingConfig::default()
    }
}

impl PageConfig {
    /// The portfolio page: loader, hero, about, projects, contact and
    /// footer with their entrance timelines, loops, hovers and parallax.
    pub fn portfolio() -> Self {
        Self {
            motion: Default::default(),
            loading: loading(),
            navigation: NavigationConfig::default(),
            contact: ContactConfig::default(),
            sections: vec![hero(), about(), projects(), contact(), footer()],
        }
    }
}
