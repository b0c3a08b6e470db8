use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::{self, Write};

/// Writes values as tab-indented JSON, one newline-terminated value per call
pub struct JsonWriter<W: Write> {
    out: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Serialize `value` and flush it so each result appears as soon as it is ready
    pub fn write<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        let mut serializer =
            Serializer::with_formatter(&mut self.out, PrettyFormatter::with_indent(b"\t"));
        value.serialize(&mut serializer)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Render `value` the way [`JsonWriter`] writes it
pub fn to_tab_indented<T: Serialize>(value: &T) -> io::Result<String> {
    let mut writer = JsonWriter::new(Vec::new());
    writer.write(value)?;
    String::from_utf8(writer.into_inner()).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
