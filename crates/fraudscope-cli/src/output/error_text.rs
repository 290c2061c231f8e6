use fraudscope_client::ClientError;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        format!("Error: {}", error.code),
        String::new(),
        format!("  {}", error.message),
        String::new(),
        "Next steps:".to_string(),
    ];

    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        lines.extend(
            error
                .recovery_steps
                .iter()
                .enumerate()
                .map(|(index, step)| format!("  {}. {step}", index + 1)),
        );
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use fraudscope_client::ClientError;

    use super::render_error;

    #[test]
    fn renders_standard_error_layout() {
        let error = ClientError::validation_gate_closed(Path::new("status.txt"));

        let rendered = render_error(&error);
        assert!(rendered.starts_with("Error: validation_gate_closed"));
        assert!(rendered.contains("status.txt"));
        assert!(rendered.contains("Next steps:"));
        assert!(rendered.contains("  1. Run `fraudscope validate`"));
    }

    #[test]
    fn falls_back_to_retry_hint() {
        let error = ClientError::new("internal_serialization_error", "boom", Vec::new());
        assert!(render_error(&error).ends_with("  1. Retry the command."));
    }
}
