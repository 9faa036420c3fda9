use once_cell::sync::Lazy;
use regex::Regex;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

static CODE_FENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[a-zA-Z]*\s*\n(.*?)\n?```$").unwrap());

static MULTIPLE_NEWLINES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Cleans generated post markup by removing model artifacts
pub fn clean_generated_markup(response: &str) -> String {
    let mut cleaned = THINK_TAG_PATTERN.replace_all(response, "").to_string();

    // Remove <reasoning>...</reasoning> tags (some models use this)
    cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "").to_string();

    cleaned = cleaned.trim().to_string();

    // Unwrap a body that came back as one fenced ```html block
    if let Some(inner) = CODE_FENCE_PATTERN
        .captures(&cleaned)
        .and_then(|caps| caps.get(1))
    {
        cleaned = inner.as_str().trim().to_string();
    }

    // Collapse multiple consecutive newlines into at most two
    MULTIPLE_NEWLINES_PATTERN
        .replace_all(&cleaned, "\n\n")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_think_tags() {
        let input = "<think>Some reasoning here</think><h1>Post</h1>";
        assert_eq!(clean_generated_markup(input), "<h1>Post</h1>");
    }

    #[test]
    fn test_clean_self_closing_think() {
        let input = "<think/><p>Body</p>";
        assert_eq!(clean_generated_markup(input), "<p>Body</p>");
    }

    #[test]
    fn test_clean_reasoning_tags() {
        let input = "<reasoning>Internal reasoning</reasoning><p>Final</p>";
        assert_eq!(clean_generated_markup(input), "<p>Final</p>");
    }

    #[test]
    fn test_unwrap_code_fence() {
        let input = "```html\n<h1>Post</h1>\n<p>Body</p>\n```";
        assert_eq!(clean_generated_markup(input), "<h1>Post</h1>\n<p>Body</p>");
    }

    #[test]
    fn test_clean_multiple_newlines() {
        let input = "<p>One</p>\n\n\n\n\n<p>Two</p>";
        assert_eq!(clean_generated_markup(input), "<p>One</p>\n\n<p>Two</p>");
    }

    #[test]
    fn test_clean_preserves_normal_markup() {
        let input = "<h2>The Sunset</h2>\n<ul><li>Song</li></ul>";
        assert_eq!(clean_generated_markup(input), input);
    }
}
