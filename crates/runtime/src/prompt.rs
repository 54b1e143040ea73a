//! System prompt rendering for tool selection.

use gateway::Tool;

const INSTRUCTIONS: &str = "You are an assistant specialized in interpreting queries and mapping \
them to the correct tool. Analyze the user's query and determine which tool to use and what \
parameters to send. Reply ONLY with a JSON object containing exactly these fields:\n\
- tool: name of the tool to use\n\
- parameters: object with the necessary parameters\n\
- explanation: brief explanation of what you understood\n\n";

/// Render the tool catalog into a system prompt.
///
/// Tools and their parameters are listed in catalog order; required
/// parameters are marked `[REQUIRED]`.
pub fn render(tools: &[Tool]) -> String {
    let mut prompt = String::from(INSTRUCTIONS);
    prompt.push_str("Available tools:\n\n");

    for tool in tools {
        prompt.push_str(&format!("Name: {}\n", tool.name));
        prompt.push_str(&format!("Description: {}\n", tool.description));
        prompt.push_str("Parameters:\n");

        for param in &tool.parameters {
            prompt.push_str(&format!(
                "  - {} ({}): {}",
                param.name, param.param_type, param.description
            ));
            if param.required {
                prompt.push_str(" [REQUIRED]");
            }
            prompt.push('\n');
        }

        prompt.push('\n');
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway::ToolParameter;

    fn catalog() -> Vec<Tool> {
        vec![
            Tool::new("calculator", "Basic arithmetic")
                .with_parameter(ToolParameter::new("operation", "string", "Operation").required())
                .with_parameter(ToolParameter::new("a", "number", "First operand").required())
                .with_parameter(ToolParameter::new("precision", "integer", "Decimal places")),
            Tool::new("clock", "Current time"),
        ]
    }

    #[test]
    fn starts_with_instructions() {
        let prompt = render(&catalog());
        assert!(prompt.starts_with("You are an assistant"));
        assert!(prompt.contains("Reply ONLY with a JSON object"));
        for key in ["- tool:", "- parameters:", "- explanation:"] {
            assert!(prompt.contains(key), "missing {key}");
        }
    }

    #[test]
    fn renders_tools_in_catalog_order() {
        let prompt = render(&catalog());
        let expected = "Available tools:\n\n\
            Name: calculator\n\
            Description: Basic arithmetic\n\
            Parameters:\n  \
            - operation (string): Operation [REQUIRED]\n  \
            - a (number): First operand [REQUIRED]\n  \
            - precision (integer): Decimal places\n\
            \n\
            Name: clock\n\
            Description: Current time\n\
            Parameters:\n\
            \n";
        assert!(prompt.ends_with(expected), "got:\n{prompt}");
    }

    #[test]
    fn empty_catalog_still_has_instructions() {
        let prompt = render(&[]);
        assert!(prompt.ends_with("Available tools:\n\n"));
    }
}
