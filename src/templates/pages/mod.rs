pub mod attribution;
pub mod lead_card;
pub mod new_lead;
pub mod queue_board;

pub use attribution::attribution_page;
pub use lead_card::{lead_card_page, LeadCardVm};
pub use new_lead::new_lead_page;
pub use queue_board::{queue_board_page, QueueBoardVm};
