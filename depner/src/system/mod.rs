mod oracle;
pub use self::oracle::Oracle;

mod parser_state;
pub use self::parser_state::{ParserState, Position};

mod transition;
pub use self::transition::Transition;

mod trans_system;
pub(crate) use self::trans_system::{can_shift, labels_agree};
pub use self::trans_system::{OracleError, TransitionSystem, Transitions};
