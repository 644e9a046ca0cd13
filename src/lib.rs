//! dynawave renders decorative wave outlines as SVG path data and morphs between them.
//!
//! # Pipeline overview
//!
//! 1. **Generate**: [`WaveConfig`] + a [`WaveRandom`] source → path data (`M`, `L`, `Q`, `Z`)
//! 2. **Parse**: path data → [`CurvePoint`]s, one per quadratic segment
//! 3. **Interpolate**: two equal-length point lists + progress → blended path data
//! 4. **Sequence**: a [`Sequencer`] drives progress from host frame callbacks and rotates
//!    current → target → pending shapes
//!
//! Host concerns (frame scheduling, rendering, visibility) are injected through the
//! [`FrameScheduler`], [`WaveSurface`] and [`VisibilityObserver`] traits, so the engine runs the
//! same in a browser binding, a native UI or a test with a [`ManualScheduler`].
#![forbid(unsafe_code)]

mod animation;
mod foundation;
mod wave;
mod widget;

pub use animation::host::{
    FrameRequest, FrameScheduler, ManualScheduler, ObserveMode, ObserveSpec, ObserverOptions,
    RecordingSurface, VisibilityObserver, WaveComplete, WaveSurface,
};
pub use animation::sequencer::{
    AnimationState, DEFAULT_LOOP_MS, DEFAULT_ONE_OFF_MS, Phase, Sequencer,
};
pub use foundation::core::{Axis, Canvas, CurvePoint, Point};
pub use foundation::error::{DynawaveError, DynawaveResult};
pub use foundation::random::{FixedRandom, SeededRandom, ThreadRandom, WaveRandom, random_for_seed};
pub use wave::codec::{decode_seed, encode_seed, normalize_whitespace, parse_path};
pub use wave::generate::{WaveConfig, generate};
pub use wave::interpolate::{interpolate, render_points};
pub use widget::instance::{HostEnv, WaveWidget};
pub use widget::settings::{
    DEFAULT_POINT_COUNT, DEFAULT_VARIANCE, Direction, WaveSettings, attr,
};
pub use widget::svg::{HostElement, RasterImage, rasterize, standalone_svg, svg_markup};
