use crate::request::{GenerationRequest, Theme};

/// Builds the instruction sent to the model for one request.
/// Theme clauses follow the fixed fantasy, futuristic, funny order.
#[must_use]
pub fn build_prompt(request: &GenerationRequest) -> String {
    let numbers = if request.allow_numbers() {
        "It may include numbers,"
    } else {
        "It must not include numbers,"
    };

    let mut parts = vec![
        format!(
            "Generate a unique username for online use that is exactly {} characters long.",
            request.desired_length()
        ),
        numbers.to_string(),
        "and it must be creative and pronounceable.".to_string(),
    ];
    parts.extend(request.themes().iter().map(|t| theme_clause(t).to_string()));
    parts.push("Only respond with the username itself and nothing else.".to_string());

    parts.join(" ")
}

fn theme_clause(theme: Theme) -> &'static str {
    match theme {
        Theme::Fantasy => "Give it a fantasy feel, like a name from a legend or a magical realm.",
        Theme::Futuristic => "Make it sound futuristic, like something from science fiction.",
        Theme::Funny => "Make it funny and playful.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ThemeSet;

    #[test]
    fn embeds_length_and_digit_rule() {
        let req = GenerationRequest::new(8, false, ThemeSet::empty()).unwrap();
        let prompt = build_prompt(&req);
        assert!(prompt.contains("exactly 8 characters long"));
        assert!(prompt.contains("It must not include numbers,"));
        assert!(prompt.ends_with("Only respond with the username itself and nothing else."));

        let req = GenerationRequest::new(12, true, ThemeSet::empty()).unwrap();
        assert!(build_prompt(&req).contains("It may include numbers,"));
    }

    #[test]
    fn theme_clauses_keep_fixed_order() {
        let themes = ThemeSet::empty().with(Theme::Funny).with(Theme::Fantasy).with(Theme::Futuristic);
        let prompt = build_prompt(&GenerationRequest::new(6, false, themes).unwrap());

        let fantasy = prompt.find("fantasy feel").unwrap();
        let futuristic = prompt.find("futuristic").unwrap();
        let funny = prompt.find("funny").unwrap();
        let tail = prompt.find("Only respond").unwrap();
        assert!(fantasy < futuristic && futuristic < funny && funny < tail);
    }

    #[test]
    fn no_theme_text_without_flags() {
        let prompt = build_prompt(&GenerationRequest::new(6, false, ThemeSet::empty()).unwrap());
        assert!(!prompt.contains("fantasy"));
        assert!(!prompt.contains("funny"));
    }
}
