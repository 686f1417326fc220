pub mod approve_request_command;
pub mod reject_request_command;

pub use approve_request_command::{ApproveRequestCommand, ApproveRequestResult};
pub use reject_request_command::RejectRequestCommand;
