//! Input validation and sanitization.
//!
//! Descriptions are trimmed, length-checked (3 to 1000 characters after
//! trimming) and then stripped of all markup before they are stored.

use crate::error::ValidationError;
use crate::todo::{CreateTodoRequest, NewTodo, Priority};

/// Minimum description length, in characters, after trimming.
pub const DESCRIPTION_MIN_LENGTH: usize = 3;

/// Maximum description length, in characters, after trimming.
pub const DESCRIPTION_MAX_LENGTH: usize = 1000;

/// Wire name of the description field.
pub const DESCRIPTION_FIELD: &str = "description";

/// Wire name of the priority field.
pub const PRIORITY_FIELD: &str = "priority";

/// User-facing validation messages.
pub mod messages {
    /// Description missing.
    pub const DESCRIPTION_REQUIRED: &str = "A to-do description is required.";
    /// Description shorter than the minimum.
    pub const DESCRIPTION_MIN_LENGTH: &str =
        "A to-do description must be at least 3 characters long.";
    /// Description longer than the maximum.
    pub const DESCRIPTION_MAX_LENGTH: &str = "A to-do description cannot exceed 1000 characters.";
    /// Priority not recognised.
    pub const INVALID_PRIORITY: &str = "Invalid priority value.";
    /// Page number below 1.
    pub const PAGE_NUMBER_RANGE: &str = "Page number must be greater than or equal to 1.";
    /// Page size outside 1..=100.
    pub const PAGE_SIZE_RANGE: &str = "Page size must be between 1 and 100.";
}

/// Checks the trimmed length of a description.
///
/// # Errors
///
/// Returns a [`ValidationError`] on the `description` field when the trimmed
/// text is blank, shorter than [`DESCRIPTION_MIN_LENGTH`], or longer than
/// [`DESCRIPTION_MAX_LENGTH`] characters.
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    let length = description.trim().chars().count();
    if length == 0 {
        return Err(ValidationError::field(
            DESCRIPTION_FIELD,
            messages::DESCRIPTION_REQUIRED,
        ));
    }
    if length < DESCRIPTION_MIN_LENGTH {
        return Err(ValidationError::field(
            DESCRIPTION_FIELD,
            messages::DESCRIPTION_MIN_LENGTH,
        ));
    }
    if length > DESCRIPTION_MAX_LENGTH {
        return Err(ValidationError::field(
            DESCRIPTION_FIELD,
            messages::DESCRIPTION_MAX_LENGTH,
        ));
    }
    Ok(())
}

/// Validates a create request and returns it with a sanitized description.
///
/// # Errors
///
/// Returns a [`ValidationError`] if the description length is out of range.
pub fn validate_new_todo(todo: &NewTodo) -> Result<NewTodo, ValidationError> {
    validate_description(&todo.description)?;
    Ok(NewTodo {
        description: sanitize(todo.description.trim()),
        priority: todo.priority,
        due_date: todo.due_date,
    })
}

impl CreateTodoRequest {
    /// Turns a raw create body into a [`NewTodo`], collecting every field error.
    ///
    /// The description is length-checked but not yet sanitized; that happens
    /// in [`validate_new_todo`] when the store accepts it.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] with one entry per failing field.
    pub fn into_new_todo(self) -> Result<NewTodo, ValidationError> {
        let mut errors = ValidationError::new();

        let description = match self.description {
            None => {
                errors.push(DESCRIPTION_FIELD, messages::DESCRIPTION_REQUIRED);
                String::new()
            }
            Some(text) => {
                if let Err(err) = validate_description(&text) {
                    for message in err.messages_for(DESCRIPTION_FIELD) {
                        errors.push(DESCRIPTION_FIELD, message.clone());
                    }
                }
                text
            }
        };

        let priority = match self.priority.as_ref().map(|p| p.resolve()) {
            None => Priority::None,
            Some(Ok(priority)) => priority,
            Some(Err(_)) => {
                errors.push(PRIORITY_FIELD, messages::INVALID_PRIORITY);
                Priority::None
            }
        };

        errors.into_result()?;

        Ok(NewTodo {
            description,
            priority,
            due_date: self.due_date,
        })
    }
}

/// Strips all markup from user text.
///
/// Tags and comments are removed. The bodies of `<script>` and `<style>`
/// elements are dropped entirely. A `<` that cannot open a tag (for example in
/// `a < b`) is kept as text. Stripping repeats until the text stops changing,
/// so removing one tag can never splice together a new one. The result is
/// trimmed.
///
/// # Examples
///
/// ```
/// use ezratask_core::validation::sanitize;
///
/// assert_eq!(sanitize("<p>Buy <b>milk</b></p>"), "Buy milk");
/// assert_eq!(sanitize("Hi<script>alert(1)</script>"), "Hi");
/// assert_eq!(sanitize("1 < 2"), "1 < 2");
/// ```
#[must_use]
pub fn sanitize(input: &str) -> String {
    let mut current = strip_markup(input);
    loop {
        let next = strip_markup(&current);
        if next == current {
            return current.trim().to_string();
        }
        current = next;
    }
}

fn strip_markup(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let len = chars.len();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < len {
        if chars[i] != '<' || !opens_markup(chars.get(i + 1).copied()) {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        if starts_with(&chars, i, "<!--") {
            i = find(&chars, i + 4, "-->").map_or(len, |end| end + 3);
            continue;
        }

        let name = tag_name(&chars, i + 1);
        i = skip_tag(&chars, i + 1);

        if matches!(name.as_str(), "script" | "style") && !chars[..i].ends_with(&['/', '>']) {
            let closing = format!("</{name}");
            i = find_ignore_case(&chars, i, &closing).map_or(len, |start| skip_tag(&chars, start + 1));
        }
    }

    out
}

fn opens_markup(next: Option<char>) -> bool {
    next.is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
}

/// Lowercased element name starting at `i` (just after `<`).
fn tag_name(chars: &[char], i: usize) -> String {
    chars[i..]
        .iter()
        .take_while(|c| c.is_ascii_alphanumeric())
        .map(char::to_ascii_lowercase)
        .collect()
}

/// Index just past the `>` closing the tag body starting at `i`, honouring
/// quoted attribute values. Unterminated tags run to the end of input.
fn skip_tag(chars: &[char], mut i: usize) -> usize {
    let mut in_single = false;
    let mut in_double = false;
    while i < chars.len() {
        match chars[i] {
            '"' if !in_single => in_double = !in_double,
            '\'' if !in_double => in_single = !in_single,
            '>' if !in_single && !in_double => return i + 1,
            _ => {}
        }
        i += 1;
    }
    chars.len()
}

fn starts_with(chars: &[char], i: usize, pattern: &str) -> bool {
    let mut idx = i;
    for p in pattern.chars() {
        if chars.get(idx) != Some(&p) {
            return false;
        }
        idx += 1;
    }
    true
}

fn find(chars: &[char], from: usize, pattern: &str) -> Option<usize> {
    (from..chars.len()).find(|&i| starts_with(chars, i, pattern))
}

fn find_ignore_case(chars: &[char], from: usize, pattern: &str) -> Option<usize> {
    let pattern: Vec<char> = pattern.chars().collect();
    (from..chars.len()).find(|&i| {
        pattern.iter().enumerate().all(|(offset, p)| {
            chars
                .get(i + offset)
                .is_some_and(|c| c.eq_ignore_ascii_case(p))
        })
    })
}
