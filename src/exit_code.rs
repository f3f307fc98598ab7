use crate::error::RestyError;

pub fn exit_code_for_error(err: &RestyError) -> i32 {
    match err {
        RestyError::InvalidUrl(_) => 3,
        RestyError::Config(_) => 2,
        RestyError::Auth(_) => 94,
        RestyError::Timeout => 28,
        RestyError::Io(_) => 23,
        RestyError::Json(_) => 26,
        RestyError::Status { .. } => 22,
        RestyError::Transport(_) => 56,
        RestyError::Http(err) => http_exit_code(err),
    }
}

fn http_exit_code(err: &reqwest::Error) -> i32 {
    if err.is_timeout() {
        return 28;
    }
    if err.is_connect() {
        return 7;
    }
    if err.is_builder() {
        return 3;
    }
    if err.is_request() {
        return 2;
    }
    43
}
