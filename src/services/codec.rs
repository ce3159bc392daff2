//! Conversion between `types.xml` documents and [`TypeRecord`]s.
//!
//! Import is lenient about content (unknown children are ignored, bad numbers
//! become 0) but strict about structure: the document must be well-formed XML
//! with a `<types>` root. Export always writes the canonical shape so that
//! export → import → export is byte-stable.

use super::xml_model::{FlagsElement, NamedElement, TypeElement, TypesDocument};
use crate::error::{Result, TypesError};
use crate::models::{ExportSettings, Flags, RecordId, RecordStore, TypeRecord};
use camino::Utf8Path;
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Serialize;
use std::fs;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";
const ROOT: &str = "types";

/// Outcome of merging imported records into an existing store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Ids of the records that were added, in import order.
    pub added: Vec<RecordId>,
    /// Names that were already present (or repeated in the import) and were
    /// left untouched.
    pub skipped: Vec<String>,
}

impl MergeReport {
    pub fn has_conflicts(&self) -> bool {
        !self.skipped.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.skipped.is_empty() {
            format!("{} types added", self.added.len())
        } else {
            format!(
                "{} types added, {} skipped (already present): {}",
                self.added.len(),
                self.skipped.len(),
                self.skipped.join(", ")
            )
        }
    }
}

/// Parse a `types.xml` document.
///
/// # Errors
/// [`TypesError::MalformedXml`] if the bytes are not UTF-8, not well-formed
/// XML, or the root element is not `<types>`.
pub fn import(bytes: &[u8]) -> Result<Vec<TypeRecord>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| TypesError::MalformedXml(format!("not valid UTF-8: {}", e)))?;
    import_str(text)
}

/// Parse a `types.xml` document that is already text.
pub fn import_str(xml: &str) -> Result<Vec<TypeRecord>> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    check_document(xml)?;

    let document: TypesDocument = quick_xml::de::from_str(xml)?;

    let records: Vec<TypeRecord> = document
        .types
        .into_iter()
        .filter_map(element_to_record)
        .collect();

    tracing::debug!("Parsed {} types", records.len());
    Ok(records)
}

/// Serialize records in the given order.
pub fn export<'a, I>(records: I, settings: &ExportSettings) -> Result<String>
where
    I: IntoIterator<Item = &'a TypeRecord>,
{
    let document = TypesDocument {
        types: records.into_iter().map(record_to_element).collect(),
    };

    let mut buffer = String::new();
    if settings.xml_declaration {
        buffer.push_str(XML_DECLARATION);
    }

    let mut serializer = quick_xml::se::Serializer::with_root(&mut buffer, Some(ROOT))?;
    if settings.indent > 0 {
        serializer.indent(' ', settings.indent);
    }
    document.serialize(serializer)?;
    buffer.push('\n');

    Ok(buffer)
}

/// Read and parse a `types.xml` file.
pub fn import_file(path: &Utf8Path) -> Result<Vec<TypeRecord>> {
    let bytes = fs::read(path).map_err(|source| TypesError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = import(&bytes)?;
    tracing::info!("Imported {} types from {}", records.len(), path);
    Ok(records)
}

/// Serialize records and write them to `path`, replacing any existing file.
pub fn export_file<'a, I>(records: I, path: &Utf8Path, settings: &ExportSettings) -> Result<usize>
where
    I: IntoIterator<Item = &'a TypeRecord>,
{
    let records: Vec<&TypeRecord> = records.into_iter().collect();
    let xml = export(records.iter().copied(), settings)?;
    fs::write(path, xml).map_err(|source| TypesError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Exported {} types to {}", records.len(), path);
    Ok(records.len())
}

/// Add imported records to `store`. Existing names win; collisions are
/// reported, never overwritten.
pub fn merge_into<I>(store: &mut RecordStore, records: I) -> MergeReport
where
    I: IntoIterator<Item = TypeRecord>,
{
    let mut report = MergeReport::default();
    for record in records {
        let name = record.name.clone();
        match store.add(record) {
            Ok(id) => report.added.push(id),
            Err(e) => {
                tracing::debug!("Skipping imported type {}: {}", name, e);
                report.skipped.push(name);
            }
        }
    }
    if report.has_conflicts() {
        tracing::warn!(
            "Merge kept {} existing types: {}",
            report.skipped.len(),
            report.skipped.join(", ")
        );
    }
    report
}

/// Well-formedness pass with the pull reader; also locates the root element.
fn check_document(xml: &str) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut root: Option<String> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            TypesError::MalformedXml(format!(
                "{} at position {}",
                e,
                reader.error_position()
            ))
        })?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                if depth == 0 {
                    if let Some(existing) = &root {
                        return Err(TypesError::MalformedXml(format!(
                            "second top-level element <{}> after <{}>",
                            String::from_utf8_lossy(e.name().as_ref()),
                            existing
                        )));
                    }
                    root = Some(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                }
                if matches!(event, Event::Start(_)) {
                    depth += 1;
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Text(ref t) if depth == 0 => {
                if !t.iter().all(u8::is_ascii_whitespace) {
                    return Err(TypesError::MalformedXml(
                        "text outside the root element".to_string(),
                    ));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(TypesError::MalformedXml(
            "unexpected end of document: unclosed element".to_string(),
        ));
    }

    match root.as_deref() {
        Some(ROOT) => Ok(()),
        Some(other) => Err(TypesError::MalformedXml(format!(
            "root element is <{}>, expected <{}>",
            other, ROOT
        ))),
        None => Err(TypesError::MalformedXml(
            "document has no root element".to_string(),
        )),
    }
}

fn element_to_record(element: TypeElement) -> Option<TypeRecord> {
    let name = match element.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            tracing::warn!("Ignoring <type> without a name");
            return None;
        }
    };

    let number = |field: &str, raw: &[String]| parse_number(&name, field, raw);

    let record = TypeRecord {
        nominal: number("nominal", &element.nominal),
        lifetime: number("lifetime", &element.lifetime),
        restock: number("restock", &element.restock),
        min: number("min", &element.min),
        quantmin: number("quantmin", &element.quantmin),
        quantmax: number("quantmax", &element.quantmax),
        cost: number("cost", &element.cost),
        flags: merge_flags(&element.flags),
        category: element
            .category
            .into_iter()
            .find_map(|c| c.name.filter(|n| !n.is_empty())),
        usage: names_of(element.usage),
        value: names_of(element.value),
        tag: names_of(element.tag),
        name,
    };
    Some(record)
}

fn record_to_element(record: &TypeRecord) -> TypeElement {
    let flag = |on: bool| Some(if on { "1" } else { "0" }.to_string());
    let flags = &record.flags;

    TypeElement {
        name: Some(record.name.clone()),
        nominal: vec![record.nominal.to_string()],
        lifetime: vec![record.lifetime.to_string()],
        restock: vec![record.restock.to_string()],
        min: vec![record.min.to_string()],
        quantmin: vec![record.quantmin.to_string()],
        quantmax: vec![record.quantmax.to_string()],
        cost: vec![record.cost.to_string()],
        flags: vec![FlagsElement {
            count_in_cargo: flag(flags.count_in_cargo),
            count_in_hoarder: flag(flags.count_in_hoarder),
            count_in_map: flag(flags.count_in_map),
            count_in_player: flag(flags.count_in_player),
            crafted: flag(flags.crafted),
            deloot: flag(flags.deloot),
        }],
        category: record
            .category
            .iter()
            .map(|c| NamedElement::new(c))
            .collect(),
        usage: record.usage.iter().map(|u| NamedElement::new(u)).collect(),
        value: record.value.iter().map(|v| NamedElement::new(v)).collect(),
        tag: record.tag.iter().map(|t| NamedElement::new(t)).collect(),
    }
}

/// Integer text of the first non-blank occurrence of a numeric child.
/// Missing or blank is 0; so is anything that does not parse, with a warning.
fn parse_number(type_name: &str, field: &str, raw: &[String]) -> i64 {
    let Some(text) = raw.iter().map(|t| t.trim()).find(|t| !t.is_empty()) else {
        return 0;
    };
    if raw.len() > 1 {
        tracing::debug!("Type {}: repeated <{}>, using '{}'", type_name, field, text);
    }
    text.parse().unwrap_or_else(|_| {
        tracing::warn!(
            "Type {}: <{}> value '{}' is not an integer, using 0",
            type_name,
            field,
            text
        );
        0
    })
}

/// `1`, any non-zero integer, or `true` switch a flag on.
fn parse_flag(raw: &str) -> bool {
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(n) => n != 0,
        Err(_) => raw.eq_ignore_ascii_case("true"),
    }
}

/// Fold every `<flags/>` element of a type; later attributes override earlier ones.
fn merge_flags(elements: &[FlagsElement]) -> Flags {
    let mut flags = Flags::default();
    for element in elements {
        let slots = [
            (&element.count_in_cargo, &mut flags.count_in_cargo),
            (&element.count_in_hoarder, &mut flags.count_in_hoarder),
            (&element.count_in_map, &mut flags.count_in_map),
            (&element.count_in_player, &mut flags.count_in_player),
            (&element.crafted, &mut flags.crafted),
            (&element.deloot, &mut flags.deloot),
        ];
        for (raw, slot) in slots {
            if let Some(raw) = raw {
                *slot = parse_flag(raw);
            }
        }
    }
    flags
}

fn names_of(elements: Vec<NamedElement>) -> Vec<String> {
    elements
        .into_iter()
        .filter_map(|e| e.name.filter(|n| !n.is_empty()))
        .collect()
}
