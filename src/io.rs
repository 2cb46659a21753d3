use bytes::BufMut;
use futures::stream::TryStreamExt;
use uuid::Uuid;
use warp::multipart::{FormData, Part};

use crate::errors::BackendError;

/// The parts of an audio submission.
#[derive(Debug)]
pub struct AudioUpload {
    pub audio: Vec<u8>,
    pub content_type: String,
    pub filename: Option<String>,
    pub transcript: String,
    pub text_id: Option<Uuid>,
}

/// Collects chunks of [`Part`].
pub async fn part_as_vec(part: Part) -> Result<Vec<u8>, BackendError> {
    part.stream()
        .try_fold(Vec::new(), |mut vec, data| {
            vec.put(data);
            async move { Ok(vec) }
        })
        .await
        .map_err(|_| BackendError::MalformedFormSubmission)
}

async fn part_as_string(part: Part) -> Result<String, BackendError> {
    let raw = part_as_vec(part).await?;

    String::from_utf8(raw).map_err(|_| BackendError::MalformedFormSubmission)
}

/// Reads the `file`, `text`, and optional `text_id` fields of an
/// upload. The file must be `audio/*`.
pub async fn parse_upload(mut form: FormData) -> Result<AudioUpload, BackendError> {
    let mut audio = None;
    let mut transcript = None;
    let mut text_id = None;

    // parts arrive as a stream, so each body must be read before the
    // next part is requested
    while let Some(part) = next_part(&mut form).await? {
        match part.name() {
            "file" => {
                let content_type = audio_content_type(part.content_type())?;
                let filename = part.filename().map(ToOwned::to_owned);
                let data = part_as_vec(part).await?;

                audio = Some((data, content_type, filename));
            }
            "text" => transcript = Some(part_as_string(part).await?),
            "text_id" => text_id = Some(part_as_string(part).await?),
            _ => {}
        }
    }

    let (audio, content_type, filename) = audio.ok_or(BackendError::PartsMissing)?;
    let transcript = transcript.ok_or(BackendError::PartsMissing)?;

    if audio.is_empty() {
        return Err(BackendError::PartsMissing);
    }

    let text_id = match text_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(id) => Some(Uuid::parse_str(id).map_err(|_| BackendError::InvalidId(id.to_owned()))?),
    };

    Ok(AudioUpload {
        audio,
        content_type,
        filename,
        transcript,
        text_id,
    })
}

/// Reads the `file` field of a text import.
pub async fn parse_import(mut form: FormData) -> Result<Vec<u8>, BackendError> {
    while let Some(part) = next_part(&mut form).await? {
        if part.name() == "file" {
            return part_as_vec(part).await;
        }
    }

    Err(BackendError::PartsMissing)
}

async fn next_part(form: &mut FormData) -> Result<Option<Part>, BackendError> {
    form.try_next()
        .await
        .map_err(|_| BackendError::MalformedFormSubmission)
}

fn audio_content_type(content_type: Option<&str>) -> Result<String, BackendError> {
    let raw = content_type.unwrap_or("application/octet-stream");

    let parsed: mime::Mime = raw
        .parse()
        .map_err(|_| BackendError::UnsupportedMediaType(raw.to_owned()))?;

    if parsed.type_() == mime::AUDIO {
        Ok(parsed.essence_str().to_owned())
    } else {
        Err(BackendError::UnsupportedMediaType(raw.to_owned()))
    }
}

/// Extracts one text per CSV record: the first column, with
/// double-quoted fields unescaped. Quoted fields may span lines. Blank
/// entries are dropped.
pub fn parse_text_rows(raw: &[u8]) -> Result<Vec<String>, BackendError> {
    let content = std::str::from_utf8(raw).map_err(|_| BackendError::MalformedCsv)?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    Ok(first_columns(content)
        .into_iter()
        .map(|c| c.trim().to_owned())
        .filter(|c| !c.is_empty())
        .collect())
}

#[derive(Clone, Copy)]
enum Field {
    Start,
    Unquoted,
    Quoted,
    AfterQuote,
}

fn first_columns(content: &str) -> Vec<String> {
    let mut columns = vec![];
    let mut column = String::new();
    let mut field = Field::Start;
    let mut in_first = true;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match (field, c) {
            (Field::Quoted, '"') if chars.peek() == Some(&'"') => {
                chars.next();

                if in_first {
                    column.push('"');
                }
            }
            (Field::Quoted, '"') => field = Field::AfterQuote,
            (Field::Quoted, c) => {
                if in_first {
                    column.push(c);
                }
            }
            (_, '\r') if chars.peek() == Some(&'\n') => {}
            (_, '\n') | (_, '\r') => {
                columns.push(std::mem::take(&mut column));
                field = Field::Start;
                in_first = true;
            }
            (_, ',') => {
                field = Field::Start;
                in_first = false;
            }
            (Field::Start, '"') => field = Field::Quoted,
            (Field::Start, ' ') | (Field::Start, '\t') => {
                if in_first {
                    column.push(c);
                }
            }
            (Field::AfterQuote, _) => {}
            (_, c) => {
                field = Field::Unquoted;

                if in_first {
                    column.push(c);
                }
            }
        }
    }

    if !column.is_empty() {
        columns.push(column);
    }

    columns
}
