//! Chartdeck Sessions
//!
//! The dashboard's reactive core: a small dependency graph of pure
//! derivations over named state cells.
//!
//! ```text
//! Upload ──► contents ──► Options     (preview, column pickers, caption)
//! SetChartType ──► chart_type, bins ──► BinsControl
//! Generate ──► clicks ──► Figure      (reads contents, x, y, color, chart_type, bins)
//! SetX / SetY / SetColor / SetBins ──► state only
//! ```
//!
//! - **cell**: named, versioned state cells and the trigger table
//! - **state**: one session and its dispatch loop
//! - **store**: in-memory session map with idle sweeping

pub mod cell;
pub mod state;
pub mod store;

pub use cell::{CellName, Derivation, StateCell};
pub use state::{Session, SessionError, SessionId, SessionInput, SessionOutput, SessionSnapshot};
pub use store::{SessionHandle, SessionStore, StoreConfig, StoreError};
