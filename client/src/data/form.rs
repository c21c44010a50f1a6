use common::string::generate_boundary;

const DEFAULT_FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// A `multipart/form-data` body under construction.
pub trait MultipartForm: Send {
    fn boundary(&self) -> &str;

    fn append(&mut self, field: &str, data: Vec<u8>, filename: Option<&str>);

    /// Consume the form and produce the encoded body.
    fn end(self: Box<Self>) -> Vec<u8>;
}

pub trait FormFactory: Send + Sync {
    fn create(&self) -> Box<dyn MultipartForm>;
}

struct FormPart {
    field: String,
    data: Vec<u8>,
    filename: Option<String>,
}

pub struct FormData {
    boundary: String,
    parts: Vec<FormPart>,
}

impl FormData {
    pub fn new() -> Self {
        FormData::with_boundary(generate_boundary())
    }

    pub fn with_boundary(boundary: String) -> Self {
        FormData { boundary, parts: Vec::new() }
    }

    fn encode_part(&self, part: &FormPart, out: &mut Vec<u8>) {
        out.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", escape_quoted(&part.field));
        if let Some(filename) = &part.filename {
            disposition.push_str(&format!("; filename=\"{}\"", escape_quoted(filename)));
        }
        out.extend_from_slice(disposition.as_bytes());
        out.extend_from_slice(b"\r\n");
        if part.filename.is_some() {
            out.extend_from_slice(format!("Content-Type: {}\r\n", DEFAULT_FILE_CONTENT_TYPE).as_bytes());
        }
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&part.data);
        out.extend_from_slice(b"\r\n");
    }
}

impl Default for FormData {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm for FormData {
    fn boundary(&self) -> &str {
        &self.boundary
    }

    fn append(&mut self, field: &str, data: Vec<u8>, filename: Option<&str>) {
        self.parts.push(FormPart {
            field: field.to_string(),
            data,
            filename: filename.map(str::to_string),
        });
    }

    fn end(self: Box<Self>) -> Vec<u8> {
        let mut out = Vec::new();
        for part in &self.parts {
            self.encode_part(part, &mut out);
        }
        out.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        out
    }
}

pub struct FormDataFactory;

impl FormFactory for FormDataFactory {
    fn create(&self) -> Box<dyn MultipartForm> {
        Box::new(FormData::new())
    }
}

// quotes and line breaks would break out of the disposition parameter
fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
