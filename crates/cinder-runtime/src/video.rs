//! Video mode negotiation
//!
//! The negotiator keeps the current accepted configuration and the previous
//! one; a change is only committed after the device accepts it, so a failed
//! change leaves the current configuration authoritative.

use cinder_core::IntSize;
use serde::{Deserialize, Serialize};

/// A display configuration as requested from or accepted by the device
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoConfig {
    pub size: IntSize,
    pub fullscreen: bool,
    pub resizeable: bool,
    /// Bits per pixel of the render surface
    pub bpp: u32,
    pub double_buffer: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            size: IntSize::new(1280, 720),
            fullscreen: false,
            resizeable: true,
            bpp: 32,
            double_buffer: true,
        }
    }
}

/// One enumerated display mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoMode {
    pub size: IntSize,
    /// Whether the mode can drive an exclusive fullscreen surface
    pub fullscreen_capable: bool,
    /// Whether a window in this mode may be resized
    pub resizeable_capable: bool,
}

/// Result of querying available resolutions.
///
/// "None" (zero matches) and "Error" (enumeration unsupported) are distinct
/// outcomes; `All` means the filters removed nothing from the enumerated set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionQuery {
    /// The platform cannot enumerate resolutions at all
    Error,
    /// Enumeration worked but no mode matched the filters
    None,
    /// Every enumerated mode matched the filters
    All(Vec<IntSize>),
    /// The filters excluded at least one candidate
    Filtered(Vec<IntSize>),
}

/// Display device seam: enumeration and configuration apply
pub trait VideoBackend {
    /// Enumerate supported modes; None when the platform cannot enumerate
    fn enumerate_modes(&self) -> Option<Vec<VideoMode>>;

    /// Try to apply a configuration. Returns true only if the device accepted
    /// it.
    fn apply(&mut self, config: &VideoConfig) -> bool;
}

/// Holds the accepted configuration and negotiates changes against the device
pub struct VideoNegotiator {
    current: VideoConfig,
    previous: VideoConfig,
}

impl VideoNegotiator {
    pub fn new(initial: VideoConfig) -> Self {
        Self {
            current: initial,
            previous: initial,
        }
    }

    /// The configuration the device has actually accepted
    pub fn config(&self) -> VideoConfig {
        self.current
    }

    /// The configuration that was current before the last accepted change
    pub fn previous_config(&self) -> VideoConfig {
        self.previous
    }

    /// Classify and list the modes matching the fullscreen/resizeable filters
    pub fn resolution_list(
        &self,
        backend: &dyn VideoBackend,
        fullscreen: bool,
        resizeable: bool,
    ) -> ResolutionQuery {
        let Some(modes) = backend.enumerate_modes() else {
            return ResolutionQuery::Error;
        };

        let total = modes.len();
        let matching: Vec<IntSize> = modes
            .into_iter()
            .filter(|m| {
                (!fullscreen || m.fullscreen_capable) && (!resizeable || m.resizeable_capable)
            })
            .map(|m| m.size)
            .collect();

        if matching.is_empty() {
            ResolutionQuery::None
        } else if matching.len() == total {
            ResolutionQuery::All(matching)
        } else {
            ResolutionQuery::Filtered(matching)
        }
    }

    /// Apply a new configuration. On acceptance the old current becomes
    /// previous and the new one becomes current; on rejection nothing changes
    /// and false is returned.
    pub fn change_config(&mut self, backend: &mut dyn VideoBackend, new: VideoConfig) -> bool {
        if !backend.apply(&new) {
            log::warn!("video config rejected: {:?}", new);
            return false;
        }
        self.previous = self.current;
        self.current = new;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubDevice {
        modes: Option<Vec<VideoMode>>,
        /// Sizes the device will accept in `apply`
        accepts: Vec<IntSize>,
    }

    impl VideoBackend for StubDevice {
        fn enumerate_modes(&self) -> Option<Vec<VideoMode>> {
            self.modes.clone()
        }

        fn apply(&mut self, config: &VideoConfig) -> bool {
            self.accepts.contains(&config.size)
        }
    }

    fn mode(w: u32, h: u32, fullscreen: bool, resizeable: bool) -> VideoMode {
        VideoMode {
            size: IntSize::new(w, h),
            fullscreen_capable: fullscreen,
            resizeable_capable: resizeable,
        }
    }

    fn stub() -> StubDevice {
        StubDevice {
            modes: Some(vec![
                mode(640, 480, true, true),
                mode(1280, 720, true, true),
                mode(1920, 1080, true, false),
            ]),
            accepts: vec![IntSize::new(640, 480), IntSize::new(1280, 720)],
        }
    }

    #[test]
    fn query_error_when_enumeration_unsupported() {
        let device = StubDevice {
            modes: None,
            accepts: vec![],
        };
        let negotiator = VideoNegotiator::new(VideoConfig::default());
        assert_eq!(
            negotiator.resolution_list(&device, false, false),
            ResolutionQuery::Error
        );
    }

    #[test]
    fn query_none_when_filters_match_nothing() {
        let device = StubDevice {
            modes: Some(vec![mode(640, 480, false, true)]),
            accepts: vec![],
        };
        let negotiator = VideoNegotiator::new(VideoConfig::default());
        assert_eq!(
            negotiator.resolution_list(&device, true, false),
            ResolutionQuery::None
        );
    }

    #[test]
    fn query_all_when_filters_remove_nothing() {
        let device = stub();
        let negotiator = VideoNegotiator::new(VideoConfig::default());
        match negotiator.resolution_list(&device, false, false) {
            ResolutionQuery::All(sizes) => assert_eq!(sizes.len(), 3),
            other => panic!("expected All, got {other:?}"),
        }
    }

    #[test]
    fn query_filtered_when_filters_exclude_a_candidate() {
        let device = stub();
        let negotiator = VideoNegotiator::new(VideoConfig::default());
        match negotiator.resolution_list(&device, true, true) {
            ResolutionQuery::Filtered(sizes) => {
                assert_eq!(sizes, vec![IntSize::new(640, 480), IntSize::new(1280, 720)]);
            }
            other => panic!("expected Filtered, got {other:?}"),
        }
    }

    #[test]
    fn query_is_deterministic() {
        let device = stub();
        let negotiator = VideoNegotiator::new(VideoConfig::default());
        let first = negotiator.resolution_list(&device, true, true);
        let second = negotiator.resolution_list(&device, true, true);
        assert_eq!(first, second);
    }

    #[test]
    fn accepted_change_moves_current_to_previous() {
        let mut device = stub();
        let mut negotiator = VideoNegotiator::new(VideoConfig::default());
        let initial = negotiator.config();

        let new = VideoConfig {
            size: IntSize::new(640, 480),
            ..initial
        };
        assert!(negotiator.change_config(&mut device, new));
        assert_eq!(negotiator.config(), new);
        assert_eq!(negotiator.previous_config(), initial);
    }

    #[test]
    fn rejected_change_rolls_back() {
        let mut device = stub();
        let mut negotiator = VideoNegotiator::new(VideoConfig::default());
        let before = negotiator.config();

        let unsupported = VideoConfig {
            size: IntSize::new(123, 45),
            ..before
        };
        assert!(!negotiator.change_config(&mut device, unsupported));
        assert_eq!(negotiator.config(), before);
        assert_eq!(negotiator.previous_config(), before);
    }
}
