use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use pinpoint_shared::theme::{
    lightning_strikes, Particle, ParticleKind, LIGHTNING_FLASH_MS, LIGHTNING_TICK_MS,
};

use crate::state::Dashboard;

fn particle_style(kind: ParticleKind, p: &Particle) -> String {
    let top = match kind {
        ParticleKind::Star => format!("top: {:.2}%;", p.top_pct),
        ParticleKind::RainDrop | ParticleKind::SnowFlake => format!("top: {:.0}%;", p.top_pct),
    };
    format!(
        "left: {:.2}%; {top} width: {size:.1}px; height: {height:.1}px; animation-delay: {:.2}s; animation-duration: {:.2}s;",
        p.left_pct,
        p.delay_s,
        p.duration_s,
        size = p.size_px,
        height = match kind {
            ParticleKind::RainDrop => p.size_px * 10.0,
            _ => p.size_px,
        },
    )
}

/// Weather effects layer behind the page content.
#[component]
pub fn Background() -> Element {
    let theme = use_context::<Dashboard>().theme;
    let mut flash = use_signal(|| false);

    // Roll for a strike on every tick while a thunderstorm is showing
    use_future(move || async move {
        loop {
            TimeoutFuture::new(LIGHTNING_TICK_MS).await;
            if !theme.peek().has_lightning() || !lightning_strikes(js_sys::Math::random()) {
                continue;
            }
            flash.set(true);
            TimeoutFuture::new(LIGHTNING_FLASH_MS).await;
            flash.set(false);
        }
    });

    let current = *theme.read();
    let layers: Vec<(&'static str, Vec<String>)> = current
        .particle_kinds()
        .iter()
        .map(|&kind| {
            let styles = kind.layout().iter().map(|p| particle_style(kind, p)).collect();
            (kind.css_class(), styles)
        })
        .collect();

    rsx! {
        div { class: "background",
            for (class, styles) in layers {
                div { class: "particles {class}-layer",
                    for style in styles {
                        div { class: "{class}", style: "{style}" }
                    }
                }
            }
            if *flash.read() && current.has_lightning() {
                div { class: "lightning" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raindrops_are_elongated() {
        let p = Particle {
            left_pct: 12.5,
            top_pct: -10.0,
            delay_s: 0.25,
            duration_s: 0.75,
            size_px: 2.0,
        };
        let style = particle_style(ParticleKind::RainDrop, &p);
        assert!(style.contains("left: 12.50%;"));
        assert!(style.contains("top: -10%;"));
        assert!(style.contains("height: 20.0px;"));
        assert!(style.contains("animation-duration: 0.75s;"));
    }

    #[test]
    fn test_stars_are_square() {
        let p = Particle {
            left_pct: 50.0,
            top_pct: 33.333,
            delay_s: 1.0,
            duration_s: 2.5,
            size_px: 2.0,
        };
        let style = particle_style(ParticleKind::Star, &p);
        assert!(style.contains("top: 33.33%;"));
        assert!(style.contains("width: 2.0px; height: 2.0px;"));
    }
}
