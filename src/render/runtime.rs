//! Client-side wiring emitted into the rendered document.
//!
//! The player script follows the [`crate::sync::SyncCoordinator`] protocol,
//! with a per-pair guard released lazily after [`GUARD_RELEASE_DELAY`] and
//! seeks corrected only beyond [`SYNC_TOLERANCE`]. It also swaps a failed
//! player for the media-unavailable placeholder.

use super::card::{SyncBinding, MEDIA_UNAVAILABLE};
use super::dom::Element;
use crate::sync::{MediaEvent, GUARD_RELEASE_DELAY, SYNC_TOLERANCE};
use showcase_core::Result;

/// Id of the JSON block listing the pairs to keep in sync
pub const BINDINGS_ELEMENT_ID: &str = "sync-bindings";

const PLAYER_SCRIPT: &str = r##"(function () {
  "use strict";
  var TOLERANCE = __TOLERANCE__;
  var RELEASE_MS = __RELEASE_MS__;
  var EVENTS = __EVENTS__;
  var UNAVAILABLE = __UNAVAILABLE__;

  function mirror(event, source, target) {
    if (event === "play") {
      var started = target.play();
      if (started && typeof started.catch === "function") {
        started.catch(function () {});
      }
    } else if (event === "pause") {
      target.pause();
    } else if (Math.abs(target.currentTime - source.currentTime) > TOLERANCE) {
      target.currentTime = source.currentTime;
    }
  }

  function bindPair(first, second) {
    var releaseAt = 0;
    [[first, second], [second, first]].forEach(function (sides) {
      EVENTS.forEach(function (event) {
        sides[0].addEventListener(event, function () {
          var now = performance.now();
          if (now < releaseAt) {
            return;
          }
          releaseAt = now + RELEASE_MS;
          mirror(event, sides[0], sides[1]);
        });
      });
    });
  }

  function showUnavailable(video) {
    var container = video.parentNode;
    if (!container) {
      return;
    }
    var placeholder = document.createElement("div");
    placeholder.className = "video-placeholder";
    placeholder.textContent = UNAVAILABLE;
    container.replaceChildren(placeholder);
  }

  document.querySelectorAll("#content video").forEach(function (video) {
    var fail = function () {
      showUnavailable(video);
    };
    video.addEventListener("error", fail);
    video.querySelectorAll("source").forEach(function (source) {
      source.addEventListener("error", fail);
    });
    if (video.error || video.networkState === HTMLMediaElement.NETWORK_NO_SOURCE) {
      fail();
    }
  });

  var data = document.getElementById(__BINDINGS_ID__);
  var bindings = data ? JSON.parse(data.textContent) : [];
  bindings.forEach(function (binding) {
    var first = document.getElementById(binding.first);
    var second = document.getElementById(binding.second);
    if (first && second) {
      bindPair(first, second);
    }
  });
})();
"##;

/// Bindings as an `application/json` data block
pub fn bindings_script(bindings: &[SyncBinding]) -> Result<Element> {
    // `<\/` keeps the block from closing early and is still valid JSON
    let json = serde_json::to_string(bindings)?.replace("</", "<\\/");
    Ok(Element::new("script")
        .attr("type", "application/json")
        .attr("id", BINDINGS_ELEMENT_ID)
        .raw(json))
}

/// Script that wires every binding and the media error fallback
pub fn player_script() -> Result<Element> {
    let events: Vec<&str> = MediaEvent::ALL.iter().map(MediaEvent::name).collect();

    let script = PLAYER_SCRIPT
        .replace("__TOLERANCE__", &SYNC_TOLERANCE.to_string())
        .replace("__RELEASE_MS__", &GUARD_RELEASE_DELAY.as_millis().to_string())
        .replace("__EVENTS__", &serde_json::to_string(&events)?)
        .replace("__UNAVAILABLE__", &serde_json::to_string(MEDIA_UNAVAILABLE)?)
        .replace("__BINDINGS_ID__", &serde_json::to_string(BINDINGS_ELEMENT_ID)?);

    Ok(Element::new("script").raw(script))
}
