pub mod error;
pub mod event;
pub mod snapshot;
pub mod state;
pub mod table;
pub mod view;

pub use error::{GameError, InvalidOperation, RuleViolation};
pub use event::{EventLog, HintMatch, MoveEvent, MoveObserver, Silent};
pub use snapshot::GameSnapshot;
pub use state::{Game, GameStatus, Outcome};
pub use table::{GameSummary, Player, Table, TurnRecord, notify_player};
pub use view::{OwnCardKnowledge, PrivateView};
