use thiserror::Error;

/// Errors produced while tokenizing a qualified name
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QNameError {
    /// The input was empty or all whitespace
    #[error("qualified name is empty")]
    EmptyInput,
    /// A name element between two separators was empty
    #[error("empty name element at offset {offset} in \"{input}\"")]
    EmptyElement { input: String, offset: usize },
    /// A character outside the accepted set was found
    #[error("unexpected character '{found}' at offset {offset} in \"{input}\"")]
    UnexpectedCharacter {
        input: String,
        offset: usize,
        found: char,
    },
}

/// One segment of a qualified name such as `order.items->head`
///
/// `is_pointer` records that the segment was followed by a `->` access
/// (or carried the leading `*` dereference prefix, for the final segment).
/// `is_pointer_member` records that the segment was reached through a
/// pointer segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameElement {
    name: String,
    is_pointer: bool,
    is_pointer_member: bool,
}

impl NameElement {
    /// The element's text, with surrounding whitespace trimmed
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the element is a pointer (followed by `->`, or dereferenced)
    pub fn is_pointer(&self) -> bool {
        self.is_pointer
    }

    /// Whether the element was reached through a pointer element
    pub fn is_pointer_member(&self) -> bool {
        self.is_pointer_member
    }
}

/// Check a single name character against the accepted set.
///
/// Separators (`.` and the `->` pair) are handled by the scanner and never
/// reach this check.
fn is_name_char(c: char) -> bool {
    c.is_alphanumeric()
        || c.is_whitespace()
        || matches!(
            c,
            '_' | '<' | '>' | ':' | '#' | ',' | '+' | '*' | '/' | '(' | ')' | '-'
        )
}

/// Tokenize a qualified name into its ordered elements.
///
/// `a.b->c` becomes three elements: `a`, `b` (pointer, since `c` was reached
/// from it with `->`) and `c` (pointer member). A leading `*` marks the final
/// element as a pointer, so `*p` resolves to the value `p` points to.
pub fn parse_qualified_name(input: &str) -> Result<Vec<NameElement>, QNameError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(QNameError::EmptyInput);
    }

    // Leading '*' is a dereference prefix, not part of the first element.
    let mut dereferenced = false;
    let mut body = trimmed;
    while let Some(rest) = body.strip_prefix('*') {
        dereferenced = true;
        body = rest.trim_start();
    }
    if body.is_empty() {
        return Err(QNameError::EmptyElement {
            input: input.to_string(),
            offset: trimmed.len(),
        });
    }

    let mut elements: Vec<NameElement> = Vec::new();
    let mut current = String::new();
    let mut segment_start = 0usize;
    let mut previous_was_pointer = false;

    let mut push_element = |current: &mut String,
                            offset: usize,
                            ended_by_arrow: bool,
                            previous_was_pointer: &mut bool,
                            elements: &mut Vec<NameElement>|
     -> Result<(), QNameError> {
        let text = current.trim();
        if text.is_empty() {
            return Err(QNameError::EmptyElement {
                input: input.to_string(),
                offset,
            });
        }
        elements.push(NameElement {
            name: text.to_string(),
            is_pointer: ended_by_arrow,
            is_pointer_member: *previous_was_pointer,
        });
        *previous_was_pointer = ended_by_arrow;
        current.clear();
        Ok(())
    };

    let mut chars = body.char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        match c {
            '.' => {
                push_element(
                    &mut current,
                    segment_start,
                    false,
                    &mut previous_was_pointer,
                    &mut elements,
                )?;
                segment_start = offset + 1;
            }
            '-' if matches!(chars.peek(), Some((_, '>'))) => {
                chars.next();
                push_element(
                    &mut current,
                    segment_start,
                    true,
                    &mut previous_was_pointer,
                    &mut elements,
                )?;
                segment_start = offset + 2;
            }
            c if is_name_char(c) => current.push(c),
            c => {
                return Err(QNameError::UnexpectedCharacter {
                    input: input.to_string(),
                    offset,
                    found: c,
                });
            }
        }
    }

    // Final element; the dereference prefix applies here.
    push_element(
        &mut current,
        segment_start,
        false,
        &mut previous_was_pointer,
        &mut elements,
    )?;
    if dereferenced {
        if let Some(last) = elements.last_mut() {
            last.is_pointer = true;
        }
    }

    Ok(elements)
}

/// Split a stored display name into its bare text and pointer marker.
///
/// Tree rows for dereferenced values carry a leading `*` in their display
/// name; the resolver compares that marker against an element's
/// `is_pointer` flag.
pub fn split_pointer_marker(display_name: &str) -> (&str, bool) {
    let trimmed = display_name.trim();
    match trimmed.strip_prefix('*') {
        Some(rest) => (rest.trim_start(), true),
        None => (trimmed, false),
    }
}
