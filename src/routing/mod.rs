//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Partial-render request (encoded input)
//!     → input.rs (decode pathname + skip list)
//!     → matcher.rs (find route, capture params)
//!     → component_id.rs (layout chain + page)
//!     → router.rs (load + render each component, should-skip snapshot)
//!     → Return: EntriesMap or NotFound
//!
//! Build time:
//!     RouteConfig[]
//!     → build.rs (literal routes → inputs, prefetch script)
//!     → manifest.rs (client modules per input)
//! ```
//!
//! # Design Decisions
//! - Path config fetched once, immutable afterwards
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same pathname always yields the same component ids
//! - First match wins (registration order)

pub mod build;
pub mod component_id;
pub mod input;
pub mod manifest;
pub mod matcher;
pub mod router;
pub mod should_skip;

pub use build::{BuildConfigEntry, BuildEntry, ClientModuleCollector};
pub use component_id::{component_ids, ComponentId, SHOULD_SKIP_ID};
pub use input::{decode_input, encode_input, Input, SearchParams, PARAM_KEY_SKIP};
pub use matcher::{match_path, matches, ParamValue, PathParams, PathSegment, PathSpec, SegmentKind};
pub use router::{PathConfigProvider, RouteConfig, Router, SsrConfig, StaticPathConfig};
pub use should_skip::{ShouldSkipStore, SkipMarker, SkipSetter};
