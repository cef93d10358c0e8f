use crossterm::style::Stylize;

/// Kind of notice printed alongside command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    Success,
    Warning,
    Info,
}

/// Print a one-line notice to stderr so that stdout stays machine-readable.
pub fn display_status(message: &str, status: OperationStatus, use_colors: bool) {
    eprintln!("{}", status_line(message, status, use_colors));
}

pub fn status_line(message: &str, status: OperationStatus, use_colors: bool) -> String {
    if !use_colors {
        return message.to_string();
    }
    match status {
        OperationStatus::Success => message.green().to_string(),
        OperationStatus::Warning => message.yellow().to_string(),
        OperationStatus::Info => message.dim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_status_line_is_unstyled() {
        assert_eq!(
            status_line("Product created: p_1", OperationStatus::Success, false),
            "Product created: p_1"
        );
    }

    #[test]
    fn test_colored_status_line_keeps_message() {
        let line = status_line("Nothing to update", OperationStatus::Warning, true);
        assert!(line.contains("Nothing to update"));
    }
}
