//! Legacy configuration migration
//!
//! Upgrades a flat legacy server map to the current document shape. Each
//! entry gets environment-specific retry, health-check, fallback and (in
//! production) security blocks. Secret-like values are moved out into a
//! `.env.<environment>` file and replaced by `${NAME}` references.
//!
//! ```rust,no_run
//! use mcp_config::config::Environment;
//! use mcp_config::migration::{MigrationOptions, Migrator};
//!
//! # async fn example() -> mcp_config::domain::Result<()> {
//! let mut options = MigrationOptions::new("legacy-config.json");
//! options.environment = Environment::Staging;
//!
//! let outcome = Migrator::new(options).run().await?;
//! println!("wrote {}", outcome.config_path.display());
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod legacy;
pub mod migrator;
pub mod presets;
pub mod report;
pub mod sensitive;

pub use convert::{map_connection_type, Conversion};
pub use legacy::{read_legacy, LegacyDocument, LegacyServer};
pub use migrator::{MigrationOptions, MigrationOutcome, Migrator};
pub use report::MigrationReport;
