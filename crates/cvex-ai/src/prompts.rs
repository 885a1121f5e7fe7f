//! Prompt construction for contact extraction requests.
//!
//! Prompts carry a bounded excerpt of the document text and explicitly steer
//! the model away from third-party contacts (referees, supervisors), the main
//! failure mode of naive extraction.

/// Sentinel the model is instructed to return when a field is absent.
pub const NOT_FOUND: &str = "NOT_FOUND";

/// Excerpt length for single-field prompts, in characters.
pub const FIELD_EXCERPT_CHARS: usize = 3_000;

/// Excerpt length for the combined JSON prompt, in characters.
pub const COMBINED_EXCERPT_CHARS: usize = 6_000;

/// Truncate to at most `max_chars` characters on a char boundary.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Prompt asking for the document subject's full name only.
pub fn name_prompt(text: &str) -> String {
    format!(
        "Analyze this resume text and extract ONLY the candidate's full name.\n\
         The name is usually at the very top of the resume, often in a larger font or as a heading.\n\
         Do NOT include job titles, degrees, or any other text.\n\n\
         Resume text:\n{}\n\n\
         Return ONLY the candidate's full name, nothing else. If you cannot find the name, return \"{}\".",
        excerpt(text, FIELD_EXCERPT_CHARS),
        NOT_FOUND
    )
}

/// Prompt asking for the subject's own phone number, never a referee's.
pub fn phone_prompt(text: &str) -> String {
    format!(
        "Analyze this resume text and extract ONLY the candidate's personal phone number.\n\n\
         IMPORTANT:\n\
         - Extract the candidate's OWN phone number, NOT their reference's, supervisor's, or previous employer's phone\n\
         - The candidate's phone is usually at the top of the resume in the contact section\n\
         - Ignore any phone numbers in the \"References\" section or next to reference names\n\
         - Return the phone number in its original format\n\n\
         Resume text:\n{}\n\n\
         Return ONLY the candidate's phone number, nothing else. If you cannot find it or are unsure, return \"{}\".",
        excerpt(text, FIELD_EXCERPT_CHARS),
        NOT_FOUND
    )
}

/// Combined prompt requesting all three fields as a strict JSON object.
pub fn contact_prompt(text: &str) -> String {
    format!(
        "Analyze this resume text and extract the candidate's contact details.\n\n\
         IMPORTANT:\n\
         - Extract the candidate's OWN details, never a referee's, supervisor's, or employer's\n\
         - Return a JSON object with exactly the keys \"name\", \"email\" and \"phone\"\n\
         - Use null for any field you cannot find or are unsure about\n\
         - Return the JSON object only, with no commentary\n\n\
         Resume text:\n{}",
        excerpt(text, COMBINED_EXCERPT_CHARS)
    )
}

/// Vision prompt using the same JSON-object contract as [`contact_prompt`].
pub fn vision_prompt() -> String {
    "These images are pages of a scanned resume. Extract the candidate's contact details.\n\n\
     IMPORTANT:\n\
     - Extract the candidate's OWN details, never a referee's, supervisor's, or employer's\n\
     - Return a JSON object with exactly the keys \"name\", \"email\" and \"phone\"\n\
     - Use null for any field you cannot read or are unsure about\n\
     - Return the JSON object only, with no commentary"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_excerpt_short_text_untouched() {
        assert_eq!(excerpt("hello", 10), "hello");
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let text = "naïve résumé text";
        let cut = excerpt(text, 4);
        assert_eq!(cut, "naïv");
        assert_eq!(cut.chars().count(), 4);
    }

    #[test]
    fn test_name_prompt_bounds_text() {
        let long = "x".repeat(10_000);
        let prompt = name_prompt(&long);
        assert!(prompt.len() < 4_000);
        assert!(prompt.contains(NOT_FOUND));
    }

    #[test]
    fn test_contact_prompt_requests_json_keys() {
        let prompt = contact_prompt("Jane Doe");
        assert!(prompt.contains("\"name\""));
        assert!(prompt.contains("\"email\""));
        assert!(prompt.contains("\"phone\""));
        assert!(prompt.contains("Jane Doe"));
    }
}
