use crate::domain::AnnotationKind;
use crate::session::messages::Key;

/// Tool selected by `key`, if any
///
/// Digits `1` to `7` pick tools in registry order. Callers skip this while a
/// text overlay has focus, so digits can be typed.
pub fn tool_for_key(key: &Key) -> Option<AnnotationKind> {
    match key {
        Key::Char(c) => {
            let digit = c.to_digit(10)? as usize;
            digit
                .checked_sub(1)
                .and_then(|index| AnnotationKind::ALL.get(index).copied())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_map_to_tools() {
        assert_eq!(tool_for_key(&Key::Char('1')), Some(AnnotationKind::Text));
        assert_eq!(tool_for_key(&Key::Char('5')), Some(AnnotationKind::Box));
        assert_eq!(tool_for_key(&Key::Char('7')), Some(AnnotationKind::Blur));
    }

    #[test]
    fn test_other_keys_ignored() {
        assert_eq!(tool_for_key(&Key::Char('0')), None);
        assert_eq!(tool_for_key(&Key::Char('8')), None);
        assert_eq!(tool_for_key(&Key::Char('a')), None);
        assert_eq!(tool_for_key(&Key::Enter), None);
    }
}
