use tracing::{debug, info};

use crate::error::Result;
use crate::model::{ColumnMapping, Role, Table};
use crate::prompt::PromptSource;

const REPEAT_QUESTION: &str = "Write it again: ";

/// Roles whose mapped header is absent from `headers`, in role order.
pub fn missing_roles(headers: &[String], mapping: &ColumnMapping) -> Vec<Role> {
    Role::ALL
        .into_iter()
        .filter(|role| {
            let header = mapping.header(*role);
            !headers.iter().any(|candidate| candidate == header)
        })
        .collect()
}

/// Re-asks for every role whose header the table lacks until each one exists.
///
/// On return every role of the mapping names a column of `table`.
pub fn correct_mapping<P: PromptSource>(
    table: &Table,
    mut mapping: ColumnMapping,
    prompt: &mut P,
) -> Result<ColumnMapping> {
    while let Some(&role) = missing_roles(&table.headers, &mapping).first() {
        debug!(%role, header = mapping.header(role), "column not in header row");
        prompt.notify(&format!("The input {} is not correct.", mapping.header(role)))?;
        let replacement = prompt.ask(REPEAT_QUESTION)?;
        mapping.set_header(role, replacement);
    }
    info!(
        street = %mapping.street,
        city = %mapping.city,
        postal = %mapping.postal,
        gps = %mapping.gps,
        "column mapping resolved"
    );
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::error::FillError;
    use crate::prompt::ConsolePrompt;

    fn table() -> Table {
        Table {
            headers: vec!["Street".into(), "City".into(), "Postal".into(), "GPS".into()],
            rows: Vec::new(),
            origin: (0, 0),
        }
    }

    fn console(answers: &str) -> ConsolePrompt<Cursor<Vec<u8>>, Vec<u8>> {
        ConsolePrompt::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn missing_roles_reports_absent_headers() {
        let mapping = ColumnMapping::new("Street", "Town", "Postal", "Coordinates");
        assert_eq!(
            missing_roles(&table().headers, &mapping),
            vec![Role::City, Role::Gps]
        );
    }

    #[test]
    fn unknown_output_column_is_corrected() {
        let mapping = ColumnMapping::new("Street", "City", "Postal", "Coordinates");
        let mut prompt = console("GPS\n");
        let corrected = correct_mapping(&table(), mapping, &mut prompt).expect("mapping corrected");

        assert_eq!(corrected.gps, "GPS");
        assert!(missing_roles(&table().headers, &corrected).is_empty());
        let transcript = String::from_utf8(prompt.into_output()).expect("utf-8 output");
        assert!(transcript.contains("The input Coordinates is not correct."));
    }

    #[test]
    fn each_role_is_asked_until_it_resolves() {
        let mapping = ColumnMapping::new("street", "City", "Zip", "GPS");
        let mut prompt = console("Strasse\nStreet\nPostal\n");
        let corrected = correct_mapping(&table(), mapping, &mut prompt).expect("mapping corrected");

        assert_eq!(corrected, ColumnMapping::new("Street", "City", "Postal", "GPS"));
        let transcript = String::from_utf8(prompt.into_output()).expect("utf-8 output");
        assert_eq!(transcript.matches(REPEAT_QUESTION).count(), 3);
    }

    #[test]
    fn valid_mapping_needs_no_answers() {
        let mapping = ColumnMapping::new("Street", "City", "Postal", "GPS");
        let mut prompt = console("");
        let corrected =
            correct_mapping(&table(), mapping.clone(), &mut prompt).expect("mapping accepted");
        assert_eq!(corrected, mapping);
    }

    #[test]
    fn exhausted_input_surfaces_as_error() {
        let mapping = ColumnMapping::new("Street", "City", "Postal", "Coordinates");
        let mut prompt = console("Nope\n");
        let result = correct_mapping(&table(), mapping, &mut prompt);
        assert!(matches!(result, Err(FillError::PromptClosed(_))));
    }
}
