//! Fluent builder for constructing a [`World`].

use tw_agent::Schema;
use tw_core::{AirFlag, EngineResult, WorldConfig};

use crate::observer::{NoopObserver, WorldObserver};
use crate::World;

/// Fluent builder for [`World`].
///
/// # Required inputs
///
/// - [`WorldConfig`]: extent, wrapping and seeds
/// - [`Schema`]: variable layouts and breeds, from [`tw_agent::SchemaBuilder`]
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                              |
/// |-----------------|--------------------------------------|
/// | `.observer(o)`  | [`NoopObserver`]                     |
/// | `.air(flag)`    | A fresh flag nobody else holds       |
///
/// # Example
///
/// ```rust,ignore
/// let schema = SchemaBuilder::new()
///     .patches_own(&["chemical"])
///     .undirected_link_breed("friendships", "friendship", &[])
///     .build()?;
/// let (sink, events) = ChannelObserver::new();
/// let mut world = WorldBuilder::new(WorldConfig::centered(16, 16), schema)
///     .observer(Box::new(sink))
///     .build()?;
/// ```
pub struct WorldBuilder {
    config:   WorldConfig,
    schema:   Schema,
    observer: Option<Box<dyn WorldObserver>>,
    air:      Option<AirFlag>,
}

impl WorldBuilder {
    /// Create a builder with all required inputs.
    pub fn new(config: WorldConfig, schema: Schema) -> Self {
        Self { config, schema, observer: None, air: None }
    }

    /// Receive world events.  The grid-built event of the initial patch
    /// grid is already delivered to this sink.
    pub fn observer(mut self, observer: Box<dyn WorldObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Share an existing yield / halt token, e.g. one driven by an
    /// [`AirMonitor`](tw_core::AirMonitor) or a UI thread.
    pub fn air(mut self, air: AirFlag) -> Self {
        self.air = Some(air);
        self
    }

    /// Validate the configuration and build the patch grid.
    ///
    /// # Errors
    ///
    /// [`EngineError::Config`](tw_core::EngineError::Config) if the extent
    /// is empty or does not contain the origin patch.
    pub fn build(self) -> EngineResult<World> {
        World::from_parts(
            self.config,
            self.schema,
            self.air.unwrap_or_default(),
            self.observer.unwrap_or_else(|| Box::new(NoopObserver)),
        )
    }
}
