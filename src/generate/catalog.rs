//! Source catalog XML reader and prompt construction.

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{DomainMeshError, Result};

/// One catalogued data source: its owner and the keywords describing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub source_name: String,
    pub data_owner: String,
    pub keywords: Vec<String>,
}

#[derive(Default)]
struct PartialSource {
    source_name: String,
    data_owner: String,
    keywords: String,
}

/// Parse `<source>` entries and their `stable_attributes` from catalog XML.
///
/// Sources without a `Data_Owner` are skipped. Keywords are comma-separated.
/// Predefined entities and character references are decoded; unknown
/// entities are kept verbatim.
pub fn read_source_catalog(content: &str) -> Result<Vec<SourceRecord>> {
    let mut reader = Reader::from_str(content);
    let mut buf = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut current: Option<PartialSource> = None;
    let mut sources = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "source" {
                    current = Some(PartialSource::default());
                }
                path.push(name);
            }
            Ok(Event::Text(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).to_string();
                append_field(&path, current.as_mut(), &text);
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).to_string();
                append_field(&path, current.as_mut(), &text);
            }
            Ok(Event::GeneralRef(e)) => {
                let text = match e.resolve_char_ref() {
                    Ok(Some(ch)) => ch.to_string(),
                    Ok(None) => {
                        let name = String::from_utf8_lossy(e.as_ref()).to_string();
                        match resolve_predefined_entity(&name) {
                            Some(value) => value.to_string(),
                            None => {
                                log::warn!("Keeping unknown entity &{}; as written", name);
                                format!("&{};", name)
                            }
                        }
                    }
                    Err(e) => {
                        return Err(DomainMeshError::Parse(format!(
                            "catalog XML character reference error: {}",
                            e
                        )));
                    }
                };
                append_field(&path, current.as_mut(), &text);
            }
            Ok(Event::End(_)) => {
                if path.pop().as_deref() == Some("source") {
                    if let Some(partial) = current.take() {
                        if let Some(record) = finish(partial) {
                            sources.push(record);
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(DomainMeshError::Parse(format!("catalog XML parse error: {}", e)));
            }
        }
        buf.clear();
    }

    log::info!("Read {} sources from catalog", sources.len());
    Ok(sources)
}

fn append_field(path: &[String], current: Option<&mut PartialSource>, text: &str) {
    let Some(source) = current else {
        return;
    };
    let n = path.len();
    if n < 2 || path[n - 2] != "stable_attributes" {
        return;
    }
    match path[n - 1].as_str() {
        "Source_Name" => source.source_name.push_str(text),
        "Data_Owner" => source.data_owner.push_str(text),
        "Keywords" => source.keywords.push_str(text),
        _ => {}
    }
}

fn finish(partial: PartialSource) -> Option<SourceRecord> {
    let data_owner = partial.data_owner.trim().to_string();
    if data_owner.is_empty() {
        log::warn!("Skipping source '{}' without a data owner", partial.source_name.trim());
        return None;
    }
    let keywords = partial
        .keywords
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();

    Some(SourceRecord {
        source_name: partial.source_name.trim().to_string(),
        data_owner,
        keywords,
    })
}

/// Build the relationship-mapping prompt for a set of sources.
///
/// The data owner is Entity A, each keyword is Entity B, and the model is
/// asked for one `Entity A --Relationship--> Entity B` line per pair.
pub fn build_prompt(sources: &[SourceRecord]) -> String {
    let mut prompt = String::from(
        "You map keywords to meaningful business relationships. \
         For each data owner and its keywords, write relationships in the format \
         'Entity A --Relationship--> Entity B', where Entity A is the data owner and \
         Entity B is the keyword. Choose a meaningful verb for each relationship based \
         on the keyword's context. Output one relationship per line and nothing else.\n\n",
    );
    for source in sources {
        prompt.push_str(&format!("Data Owner: {}\n", source.data_owner));
        prompt.push_str(&format!("Keywords: {}\n\n", source.keywords.join(", ")));
    }
    prompt
}
