// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod counts;
pub mod dashboard;
pub mod events;
pub mod identity;
pub mod ids;
pub mod report;
pub mod save_status;
pub mod section;
pub mod sequencer;
pub mod timer;
pub mod view;
pub mod viewport;

pub use counts::*;
pub use dashboard::*;
pub use events::*;
pub use identity::*;
pub use ids::*;
pub use report::*;
pub use save_status::*;
pub use section::*;
pub use sequencer::*;
pub use timer::*;
pub use view::*;
pub use viewport::*;
