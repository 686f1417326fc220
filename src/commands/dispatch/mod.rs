pub mod dispatch_request_command;

pub use dispatch_request_command::{
    validate_allocations, BatchSelection, DispatchItemInput, DispatchRequestCommand,
    DispatchRequestResult,
};
