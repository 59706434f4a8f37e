use std::collections::HashMap;

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum StepValue {
    String(String),
    Real(f64),
    Integer(i64),
    Boolean(bool),
    Enum(String),
    Reference(u64),
    List(Vec<StepValue>),
    /// Defined-type value such as `IFCLENGTHMEASURE(70.)`.
    Typed(String, Box<StepValue>),
    Null,
    Derived,
}

impl StepValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Real or integer, looking through a defined-type wrapper.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Real(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            Self::Typed(_, inner) => inner.as_f64(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_reference(&self) -> Option<u64> {
        match self {
            Self::Reference(id) => Some(*id),
            _ => None,
        }
    }

    /// References contained in a list value; empty for anything else.
    #[must_use]
    pub fn references(&self) -> Vec<u64> {
        match self {
            Self::List(items) => items.iter().filter_map(Self::as_reference).collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepEntity {
    pub id: u64,
    pub entity_type: String,
    pub values: Vec<StepValue>,
}

impl StepEntity {
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StepValue> {
        self.values.get(index)
    }

    #[must_use]
    pub fn get_str(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(StepValue::as_str)
    }

    #[must_use]
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(StepValue::as_f64)
    }

    #[must_use]
    pub fn get_reference(&self, index: usize) -> Option<u64> {
        self.get(index).and_then(StepValue::as_reference)
    }

    #[must_use]
    pub fn get_references(&self, index: usize) -> Vec<u64> {
        self.get(index).map(StepValue::references).unwrap_or_default()
    }
}

#[derive(Debug)]
pub struct StepFile {
    pub entities: HashMap<u64, StepEntity>,
    pub schema: String,
    by_type: HashMap<String, Vec<u64>>,
}

impl StepFile {
    /// Parses ISO 10303-21 text. Entities may span several lines.
    ///
    /// Entity statements that cannot be read are skipped; a file without a
    /// DATA section is an error.
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        let mut entities = HashMap::new();
        let mut by_type: HashMap<String, Vec<u64>> = HashMap::new();
        let mut schema = String::new();
        let mut in_data = false;
        let mut saw_data = false;

        for statement in split_statements(content) {
            let statement = statement.trim();

            if statement.starts_with("FILE_SCHEMA") {
                if let Some(start) = statement.find('\'') {
                    if let Some(end) = statement[start + 1..].find('\'') {
                        schema = statement[start + 1..start + 1 + end].to_string();
                    }
                }
                continue;
            }

            match statement {
                "DATA" => {
                    in_data = true;
                    saw_data = true;
                    continue;
                }
                "ENDSEC" => {
                    in_data = false;
                    continue;
                }
                _ => {}
            }

            if in_data && statement.starts_with('#') {
                match Self::parse_entity(statement) {
                    Some(entity) => {
                        by_type
                            .entry(entity.entity_type.clone())
                            .or_default()
                            .push(entity.id);
                        entities.insert(entity.id, entity);
                    }
                    None => tracing::debug!(statement, "skipping unreadable STEP entity"),
                }
            }
        }

        if !saw_data {
            return Err(ParseError::InvalidStep {
                message: "missing DATA section".to_string(),
            });
        }

        for ids in by_type.values_mut() {
            ids.sort_unstable();
        }

        Ok(StepFile {
            entities,
            schema,
            by_type,
        })
    }

    fn parse_entity(statement: &str) -> Option<StepEntity> {
        // Format: #123=IFCWALL('guid',#ref,'name',...)
        let eq_pos = statement.find('=')?;
        let id: u64 = statement[1..eq_pos].trim().parse().ok()?;

        let rest = statement[eq_pos + 1..].trim();
        let paren_pos = rest.find('(')?;
        let entity_type = rest[..paren_pos].trim().to_uppercase();

        let mut cursor = Cursor::new(&rest[paren_pos..]);
        let values = cursor.list()?;

        Some(StepEntity {
            id,
            entity_type,
            values,
        })
    }

    #[must_use]
    pub fn get_entity(&self, id: u64) -> Option<&StepEntity> {
        self.entities.get(&id)
    }

    /// Entities of one type, ordered by id.
    #[must_use]
    pub fn get_entities_by_type(&self, entity_type: &str) -> Vec<&StepEntity> {
        self.by_type
            .get(entity_type)
            .map(|ids| ids.iter().filter_map(|id| self.entities.get(id)).collect())
            .unwrap_or_default()
    }
}

/// Splits the file at `;` outside strings, dropping `/* */` comments.
fn split_statements(content: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_string = false;
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' => {
                in_string = !in_string;
                current.push(ch);
            }
            '/' if !in_string && chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            ';' if !in_string => statements.push(std::mem::take(&mut current)),
            '\r' | '\n' if !in_string => {}
            _ => current.push(ch),
        }
    }

    if !current.trim().is_empty() {
        statements.push(current);
    }
    statements
}

/// Recursive reader for STEP parameter lists.
struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(s: &str) -> Self {
        Self {
            chars: s.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, ch: char) -> Option<()> {
        self.skip_ws();
        if self.peek() == Some(ch) {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    /// `( value, value, ... )`
    fn list(&mut self) -> Option<Vec<StepValue>> {
        self.expect('(')?;
        let mut values = Vec::new();

        self.skip_ws();
        if self.peek() == Some(')') {
            self.pos += 1;
            return Some(values);
        }

        loop {
            values.push(self.value()?);
            self.skip_ws();
            match self.peek()? {
                ',' => self.pos += 1,
                ')' => {
                    self.pos += 1;
                    return Some(values);
                }
                _ => return None,
            }
        }
    }

    fn value(&mut self) -> Option<StepValue> {
        self.skip_ws();
        match self.peek()? {
            '$' => {
                self.pos += 1;
                Some(StepValue::Null)
            }
            '*' => {
                self.pos += 1;
                Some(StepValue::Derived)
            }
            '#' => {
                self.pos += 1;
                let digits = self.take_while(|c| c.is_ascii_digit());
                digits.parse().ok().map(StepValue::Reference)
            }
            '\'' => self.string(),
            '.' => {
                self.pos += 1;
                let inner = self.take_while(|c| c != '.');
                self.expect('.')?;
                Some(match inner.as_str() {
                    "T" => StepValue::Boolean(true),
                    "F" => StepValue::Boolean(false),
                    _ => StepValue::Enum(inner),
                })
            }
            '(' => self.list().map(StepValue::List),
            c if c.is_ascii_digit() || c == '-' || c == '+' => {
                let token =
                    self.take_while(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'E' | 'e'));
                if let Ok(i) = token.parse::<i64>() {
                    return Some(StepValue::Integer(i));
                }
                // STEP reals may end with a bare dot: "70."
                let normalized = if token.ends_with('.') {
                    format!("{token}0")
                } else {
                    token.replace(".E", ".0E")
                };
                normalized.parse::<f64>().ok().map(StepValue::Real)
            }
            c if c.is_ascii_alphabetic() => {
                let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
                let mut inner = self.list()?;
                let value = if inner.len() == 1 {
                    inner.remove(0)
                } else {
                    StepValue::List(inner)
                };
                Some(StepValue::Typed(name.to_uppercase(), Box::new(value)))
            }
            _ => None,
        }
    }

    fn string(&mut self) -> Option<StepValue> {
        self.pos += 1;
        let mut raw = String::new();
        loop {
            let ch = self.peek()?;
            self.pos += 1;
            if ch == '\'' {
                if self.peek() == Some('\'') {
                    self.pos += 1;
                    raw.push('\'');
                    continue;
                }
                return Some(StepValue::String(decode_step_string(&raw)));
            }
            raw.push(ch);
        }
    }
}

/// Decode STEP/IFC encoded strings with Unicode escape sequences.
/// Supports:
/// - `\X2\XXXX\X0\` - 2-byte Unicode (BMP), can have multiple 4-char hex codes
/// - `\X\XX` - 1-byte ISO 8859-1
/// - `\S\X` - ISO 8859-1 upper half
/// - `\\` - escaped backslash
fn decode_step_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('X') => {
                chars.next();
                match chars.peek() {
                    Some('2') => {
                        chars.next(); // '2'
                        chars.next(); // '\'
                        let hex: String = chars.by_ref().take_while(|&c| c != '\\').collect();
                        // consume "X0\"
                        for _ in 0..3 {
                            chars.next();
                        }
                        for chunk in hex.as_bytes().chunks(4) {
                            let decoded = std::str::from_utf8(chunk)
                                .ok()
                                .and_then(|s| u32::from_str_radix(s, 16).ok())
                                .and_then(char::from_u32);
                            if let Some(c) = decoded {
                                result.push(c);
                            }
                        }
                    }
                    Some('\\') => {
                        chars.next();
                        let hex: String = chars.by_ref().take(2).collect();
                        if let Ok(code) = u8::from_str_radix(&hex, 16) {
                            result.push(char::from(code));
                        }
                    }
                    _ => result.push_str("\\X"),
                }
            }
            Some('S') => {
                chars.next(); // 'S'
                chars.next(); // '\'
                if let Some(c) = chars.next().and_then(|c| char::from_u32(u32::from(c) + 128)) {
                    result.push(c);
                }
            }
            Some('\\') => {
                chars.next();
                result.push('\\');
            }
            _ => result.push('\\'),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCWALL('2O2Fr$t4X7Zf8NOew3FLOH',$,'Wall; exterior',$,$,#2,$,$,
  .STANDARD.);
/* a comment */
#3=IFCPROPERTYSINGLEVALUE('FrameWidth',$,IFCLENGTHMEASURE(70.),$);
#4=IFCPROPERTYSET('x',$,'Pset',$,(#3,#5));
#5=IFCPROPERTYSINGLEVALUE('IsExternal',$,IFCBOOLEAN(.T.),$);
#6=IFCCARTESIANPOINT((1.5E3,-2.,0.));
ENDSEC;
END-ISO-10303-21;
";

    #[test]
    fn parses_schema_and_multiline_entities() {
        let file = StepFile::parse(SAMPLE).unwrap();
        assert_eq!(file.schema, "IFC4");

        let wall = file.get_entity(1).unwrap();
        assert_eq!(wall.entity_type, "IFCWALL");
        assert_eq!(wall.get_str(2), Some("Wall; exterior"));
        assert_eq!(wall.get_reference(5), Some(2));
        assert_eq!(wall.get(8), Some(&StepValue::Enum("STANDARD".into())));
    }

    #[test]
    fn keeps_defined_type_wrappers() {
        let file = StepFile::parse(SAMPLE).unwrap();
        assert_eq!(
            file.get_entity(3).unwrap().get(2),
            Some(&StepValue::Typed(
                "IFCLENGTHMEASURE".into(),
                Box::new(StepValue::Real(70.0))
            ))
        );
        assert_eq!(
            file.get_entity(5).unwrap().get(2),
            Some(&StepValue::Typed(
                "IFCBOOLEAN".into(),
                Box::new(StepValue::Boolean(true))
            ))
        );
    }

    #[test]
    fn reads_reference_lists_and_reals() {
        let file = StepFile::parse(SAMPLE).unwrap();
        assert_eq!(file.get_entity(4).unwrap().get_references(4), vec![3, 5]);

        let point = file.get_entity(6).unwrap();
        let coords: Vec<f64> = match point.get(0) {
            Some(StepValue::List(items)) => items.iter().filter_map(StepValue::as_f64).collect(),
            _ => Vec::new(),
        };
        assert_eq!(coords, vec![1500.0, -2.0, 0.0]);
    }

    #[test]
    fn index_by_type() {
        let file = StepFile::parse(SAMPLE).unwrap();
        let psvs: Vec<u64> = file
            .get_entities_by_type("IFCPROPERTYSINGLEVALUE")
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(psvs, vec![3, 5]);
    }

    #[test]
    fn missing_data_section_is_an_error() {
        assert!(matches!(
            StepFile::parse("ISO-10303-21;\nHEADER;\nENDSEC;\n"),
            Err(ParseError::InvalidStep { .. })
        ));
    }

    #[test]
    fn decodes_escapes() {
        assert_eq!(decode_step_string("Fen\\X2\\00EA\\X0\\tre"), "Fenêtre");
        assert_eq!(decode_step_string("\\X\\E9t\\X\\E9"), "été");
        assert_eq!(decode_step_string("a\\\\b"), "a\\b");
    }
}
