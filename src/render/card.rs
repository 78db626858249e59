//! Comparison cards: prompt header plus baseline and PhaseLock video slots

use super::dom::Element;
use serde::{Deserialize, Serialize};
use showcase_core::{media_type_for, Sample};

pub const BASELINE_LABEL: &str = "Baseline";
pub const OURS_LABEL: &str = "PhaseLock (Ours)";
pub const NOT_AVAILABLE: &str = "Not Available";
pub const MEDIA_UNAVAILABLE: &str = "Media Unavailable";

/// Two rendered players that must play in lockstep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncBinding {
    pub pair: usize,
    pub first: String,
    pub second: String,
}

pub fn placeholder(text: &str) -> Element {
    Element::with_class("div", "video-placeholder").text(text)
}

/// Swap a video container's player for the load-error placeholder
pub fn handle_media_error(container: &mut Element) {
    container.clear_children();
    container.append_child(placeholder(MEDIA_UNAVAILABLE));
}

fn usable_src(src: Option<&str>) -> Option<&str> {
    src.filter(|s| !s.is_empty())
}

fn player_id(pair: usize, side: &str) -> String {
    format!("player-{}-{}", pair, side)
}

fn video_wrapper(src: Option<&str>, label: &str, id: &str, sync_pair: Option<usize>) -> Element {
    let wrapper = Element::with_class("div", "video-wrapper")
        .child(Element::with_class("div", "video-label").text(label));

    let mut container = Element::with_class("div", "video-container");

    match usable_src(src) {
        Some(src) => {
            let mut video = Element::new("video")
                .attr("id", id)
                .flag("controls")
                .flag("playsinline")
                .flag("muted")
                .attr("preload", "metadata");
            if let Some(pair) = sync_pair {
                video.set_attr("data-sync-pair", pair.to_string());
            }
            video.append_child(
                Element::new("source")
                    .attr("src", src)
                    .attr("type", media_type_for(src)),
            );
            container.append_child(video);
        }
        None => container.append_child(placeholder(NOT_AVAILABLE)),
    }

    wrapper.child(container)
}

/// Build one card; `pair` numbers the sync binding if both players exist
pub fn comparison_card(sample: &Sample, pair: usize) -> (Element, Option<SyncBinding>) {
    let header = Element::with_class("div", "comp-header")
        .child(Element::with_class("div", "comp-prompt").text(sample.prompt.as_str()))
        .child(Element::with_class("div", "comp-meta"));

    let base_id = player_id(pair, "base");
    let ours_id = player_id(pair, "ours");

    let binding = match (usable_src(sample.base.as_deref()), usable_src(sample.ours.as_deref())) {
        (Some(_), Some(_)) => Some(SyncBinding {
            pair,
            first: base_id.clone(),
            second: ours_id.clone(),
        }),
        _ => None,
    };
    let sync_pair = binding.as_ref().map(|b| b.pair);

    let body = Element::with_class("div", "comp-body")
        .child(video_wrapper(sample.base.as_deref(), BASELINE_LABEL, &base_id, sync_pair))
        .child(video_wrapper(sample.ours.as_deref(), OURS_LABEL, &ours_id, sync_pair));

    let card = Element::with_class("div", "comp-card").child(header).child(body);
    (card, binding)
}
