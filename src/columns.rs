use std::sync::LazyLock;

use regex::Regex;

use crate::error::{HrError, Result};
use crate::models::{ColumnMap, ResolvedColumn, Role};

/// Ordered rule table: the first role listed claims a header first.
const ROLE_SYNONYMS: &[(Role, &[&str])] = &[
    (
        Role::Employee,
        &["empleado", "trabajador", "personal", "nombre", "usuario", "id"],
    ),
    (Role::Date, &["fecha", "date", "dia", "cuando"]),
    (Role::TimeIn, &["entrada", "inicio", "llegada", "start", "in"]),
    (Role::TimeOut, &["salida", "fin", "final", "end", "out"]),
];

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid header pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid header pattern"));

/// Lowercase, strip punctuation and join words with underscores:
/// `"Hora de Entrada"` becomes `"hora_de_entrada"`.
pub fn normalize_header(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    WHITESPACE.replace_all(stripped.trim(), "_").into_owned()
}

/// Pick a source column for each role. `headers` must already be
/// normalized with [`normalize_header`].
pub fn resolve(headers: &[String]) -> ColumnMap {
    let mut map = ColumnMap::default();
    let mut claimed = vec![false; headers.len()];

    for (role, synonyms) in ROLE_SYNONYMS {
        let found = headers.iter().enumerate().find(|(i, header)| {
            !claimed[*i] && synonyms.iter().any(|syn| header.contains(syn))
        });
        if let Some((index, header)) = found {
            claimed[index] = true;
            map.set(
                *role,
                ResolvedColumn {
                    index,
                    name: header.clone(),
                },
            );
        }
    }
    map
}

/// The employee and date columns, or the first of them that is missing.
pub fn require_mandatory(map: &ColumnMap) -> Result<(&ResolvedColumn, &ResolvedColumn)> {
    let employee = map
        .get(Role::Employee)
        .ok_or(HrError::MissingColumn(Role::Employee))?;
    let date = map.get(Role::Date).ok_or(HrError::MissingColumn(Role::Date))?;
    Ok((employee, date))
}
