use crate::game::{DriverStatus, GameRecord};
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextField {
    Description,
    Year,
    Manufacturer,
}

#[derive(Debug, Default)]
struct PendingRecord {
    name: String,
    description: String,
    year: String,
    manufacturer: String,
    driver_status: Option<DriverStatus>,
    bios: bool,
    clone_of: Option<String>,
}

impl PendingRecord {
    fn from_element(element: &BytesStart) -> Self {
        Self {
            name: attribute(element, "name").unwrap_or_default(),
            bios: attribute(element, "isbios").is_some_and(|value| value == "yes"),
            clone_of: attribute(element, "cloneof"),
            ..Default::default()
        }
    }

    fn finish(self) -> Option<GameRecord> {
        if self.name.is_empty() {
            tracing::warn!("Skipping catalogue entry without a name");
            return None;
        }

        Some(GameRecord {
            name: self.name,
            description: self.description,
            year: self.year,
            manufacturer: self.manufacturer,
            driver_status: self.driver_status,
            bios: self.bios,
            clone_of: self.clone_of,
        })
    }

    fn field_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Description => &mut self.description,
            TextField::Year => &mut self.year,
            TextField::Manufacturer => &mut self.manufacturer,
        }
    }
}

fn attribute(element: &BytesStart, key: &str) -> Option<String> {
    element
        .try_get_attribute(key)
        .ok()
        .flatten()
        .and_then(|attribute| attribute.unescape_value().ok().map(|value| value.into_owned()))
}

fn is_record(element_name: &[u8]) -> bool {
    // Older builds call them games, newer ones machines
    matches!(element_name, b"machine" | b"game")
}

/// Parses the output of `-listxml`
///
/// Records are read in document order. Anything after a syntax error is dropped but whatever
/// was read up to that point is kept.
pub fn parse_catalogue(document: &str) -> Vec<GameRecord> {
    let mut reader = Reader::from_str(document);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut pending: Option<PendingRecord> = None;
    let mut field: Option<TextField> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => match element.name().as_ref() {
                name if is_record(name) => pending = Some(PendingRecord::from_element(&element)),
                b"description" => field = Some(TextField::Description),
                b"year" => field = Some(TextField::Year),
                b"manufacturer" => field = Some(TextField::Manufacturer),
                b"driver" => read_driver(&element, pending.as_mut()),
                _ => {}
            },
            Ok(Event::Empty(element)) => match element.name().as_ref() {
                name if is_record(name) => {
                    records.extend(PendingRecord::from_element(&element).finish())
                }
                b"driver" => read_driver(&element, pending.as_mut()),
                _ => {}
            },
            Ok(Event::Text(text)) => {
                if let (Some(field), Some(record)) = (field, pending.as_mut()) {
                    match text.unescape() {
                        Ok(text) => record.field_mut(field).push_str(&text),
                        Err(err) => tracing::warn!(
                            "Skipping malformed text in catalogue entry {}: {}",
                            record.name,
                            err
                        ),
                    }
                }
            }
            Ok(Event::CData(data)) => {
                if let (Some(field), Some(record)) = (field, pending.as_mut()) {
                    record
                        .field_mut(field)
                        .push_str(&String::from_utf8_lossy(&data));
                }
            }
            Ok(Event::End(element)) => match element.name().as_ref() {
                name if is_record(name) => {
                    field = None;
                    records.extend(pending.take().and_then(PendingRecord::finish));
                }
                b"description" | b"year" | b"manufacturer" => field = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(
                    "Catalogue is malformed at byte {}, keeping the {} entries read so far: {}",
                    reader.buffer_position(),
                    records.len(),
                    err
                );
                break;
            }
        }
    }

    records
}

fn read_driver(element: &BytesStart, record: Option<&mut PendingRecord>) {
    let Some(record) = record else {
        return;
    };

    record.driver_status = attribute(element, "status").and_then(|status| status.parse().ok());
}
