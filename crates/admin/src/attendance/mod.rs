//! Attendance forms: [`RosterBuilder`] creates a class session,
//! [`RosterEditor`] loads and updates one. Both keep presence state in a
//! [`PresenceBoard`](casa_core::roster::PresenceBoard) and talk to the
//! backend through a [`RosterGateway`](crate::gateway::RosterGateway).

pub mod builder;
pub mod editor;

pub use builder::RosterBuilder;
pub use editor::{PhotoState, RosterEditor};

use casa_core::attendance::ClassSession;

/// Called after a successful save so the parent list can refresh.
pub type OnSaved = Box<dyn Fn(&ClassSession) + Send + Sync>;

pub(crate) const CREATED_MESSAGE: &str = "Chamada registrada com sucesso!";
pub(crate) const UPDATED_MESSAGE: &str = "Chamada atualizada com sucesso!";
