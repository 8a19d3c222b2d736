// https://redis.io/docs/reference/protocol-spec

use std::collections::HashSet;
use std::fmt;
use std::io::Cursor;
use std::str::{self, FromStr};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use strum_macros::Display;
use thiserror::Error as ThisError;

static CRLF: &[u8; 2] = b"\r\n";
const CR: u8 = b'\r';
const LF: u8 = b'\n';

// Verbatim strings carry a three byte format followed by a colon before the text.
const VERBATIM_FORMAT_LEN: usize = 3;
const VERBATIM_SEPARATOR: u8 = b':';

// Upper bound for pre-allocating aggregate frames, the declared count is untrusted input.
const MAX_PREALLOCATED_ELEMENTS: usize = 1024;

#[derive(Debug, ThisError, PartialEq)]
pub enum Error {
    #[error("not enough data is available to parse an entire frame")]
    Incomplete,
    #[error("invalid frame data type: {0}")]
    InvalidDataType(u8),
    #[error("could not parse {data_type}: {message}")]
    Parse { data_type: DataType, message: String },
    #[error("frame size exceeds limit of {0} bytes")]
    TooLarge(usize),
}

/// A single RESP2 or RESP3 value.
///
/// RESP2 null bulk strings (`$-1`) and null arrays (`*-1`) are decoded to [`Frame::Null`], which
/// is always written back in its RESP3 form (`_`).
#[derive(Clone, Debug)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    Array(Vec<Frame>),
    Null,
    Boolean(bool),
    Double(f64),
    BigNumber(BigInt),
    BulkError(Bytes),
    /// The format is always three bytes on the wire, such as `txt` or `mkd`.
    Verbatim { format: [u8; 3], text: String },
    Map(Vec<(Frame, Frame)>),
    Set(Vec<Frame>),
    Push(Vec<Frame>),
}

// Protocol specification: https://redis.io/docs/reference/protocol-spec/
impl Frame {
    /// Parses one frame starting at the cursor position. On success the cursor is left right
    /// after the frame. `Error::Incomplete` means more bytes are needed.
    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Self, Error> {
        // The first byte in an RESP-serialized payload always identifies its type.
        // Subsequent bytes constitute the type's contents.
        let first_byte = get_byte(src)?;
        let data_type = DataType::try_from(first_byte)?;

        match data_type {
            // +<string>\r\n
            DataType::SimpleString => {
                let line = get_line(src, data_type)?;
                Ok(Frame::Simple(to_string(line, data_type)?))
            }
            // -<error>\r\n
            DataType::SimpleError => {
                let line = get_line(src, data_type)?;
                Ok(Frame::Error(to_string(line, data_type)?))
            }
            // :[<+|->]<value>\r\n
            DataType::Integer => {
                let line = get_line(src, data_type)?;
                Ok(Frame::Integer(parse_text::<i64>(line, data_type)?))
            }
            // $<length>\r\n<data>\r\n
            DataType::BulkString => match get_length(src, data_type)? {
                None => Ok(Frame::Null),
                Some(length) => {
                    let data = get_exact(src, length, data_type)?;
                    Ok(Frame::Bulk(Bytes::copy_from_slice(data)))
                }
            },
            // !<length>\r\n<error>\r\n
            DataType::BulkError => {
                let length = get_count(src, data_type)?;
                let data = get_exact(src, length, data_type)?;
                Ok(Frame::BulkError(Bytes::copy_from_slice(data)))
            }
            // =<length>\r\n<format>:<text>\r\n
            DataType::VerbatimString => {
                // The declared length includes the format and the separator.
                let length = get_count(src, data_type)?;
                if length < VERBATIM_FORMAT_LEN + 1 {
                    return Err(parse_error(
                        data_type,
                        format!("declared length {} is shorter than the format prefix", length),
                    ));
                }

                let payload = get_exact(src, length, data_type)?;
                let (format, rest) = payload.split_at(VERBATIM_FORMAT_LEN);
                if rest[0] != VERBATIM_SEPARATOR {
                    return Err(parse_error(
                        data_type,
                        format!("expected ':' after the format, found {}", rest[0]),
                    ));
                }

                let format = <[u8; VERBATIM_FORMAT_LEN]>::try_from(format)
                    .map_err(|_| parse_error(data_type, "malformed format".to_string()))?;

                Ok(Frame::Verbatim {
                    format,
                    text: to_string(&rest[1..], data_type)?,
                })
            }
            // *<number-of-elements>\r\n<element-1>...<element-n>
            DataType::Array => match get_length(src, data_type)? {
                None => Ok(Frame::Null),
                Some(length) => Ok(Frame::Array(parse_elements(src, length)?)),
            },
            // %<number-of-entries>\r\n<key-1><value-1>...<key-n><value-n>
            DataType::Map => {
                let length = get_count(src, data_type)?;
                let mut entries = Vec::with_capacity(length.min(MAX_PREALLOCATED_ELEMENTS));
                for _ in 0..length {
                    let key = Self::parse(src)?;
                    let value = Self::parse(src)?;
                    entries.push((key, value));
                }

                Ok(Frame::Map(entries))
            }
            // ~<number-of-elements>\r\n<element-1>...<element-n>
            DataType::Set => {
                let length = get_count(src, data_type)?;
                let members = parse_elements(src, length)?;
                Ok(Frame::Set(dedup_members(members)))
            }
            // ><number-of-elements>\r\n<element-1>...<element-n>
            DataType::Push => {
                let length = get_count(src, data_type)?;
                Ok(Frame::Push(parse_elements(src, length)?))
            }
            // _\r\n
            DataType::Null => {
                let line = get_line(src, data_type)?;
                if !line.is_empty() {
                    return Err(parse_error(data_type, "expected an empty payload".to_string()));
                }

                Ok(Frame::Null)
            }
            // #<t|f>\r\n
            DataType::Boolean => match get_line(src, data_type)? {
                b"t" => Ok(Frame::Boolean(true)),
                b"f" => Ok(Frame::Boolean(false)),
                other => Err(parse_error(
                    data_type,
                    format!("expected 't' or 'f', found {:?}", String::from_utf8_lossy(other)),
                )),
            },
            // ,[<+|->]<integral>[.<fractional>][<E|e>[sign]<exponent>]\r\n
            DataType::Double => {
                let line = get_line(src, data_type)?;
                // Not every float parser agrees on these tokens, so they are matched first.
                let value = match line {
                    b"inf" => f64::INFINITY,
                    b"-inf" => f64::NEG_INFINITY,
                    b"nan" => f64::NAN,
                    _ => parse_text::<f64>(line, data_type)?,
                };

                Ok(Frame::Double(value))
            }
            // ([+|-]<number>\r\n
            DataType::BigNumber => {
                let line = get_line(src, data_type)?;
                Ok(Frame::BigNumber(parse_text::<BigInt>(line, data_type)?))
            }
        }
    }

    /// Walks one frame without building it and leaves the cursor right after it. Succeeds once
    /// the whole frame is buffered, so [`Frame::parse`] only runs on complete input.
    pub fn check(src: &mut Cursor<&[u8]>) -> Result<(), Error> {
        let data_type = DataType::try_from(get_byte(src)?)?;

        match data_type {
            DataType::SimpleString
            | DataType::SimpleError
            | DataType::Integer
            | DataType::Null
            | DataType::Boolean
            | DataType::Double
            | DataType::BigNumber => {
                get_line(src, data_type)?;
            }
            DataType::BulkString => {
                if let Some(length) = get_length(src, data_type)? {
                    get_exact(src, length, data_type)?;
                }
            }
            DataType::BulkError | DataType::VerbatimString => {
                let length = get_count(src, data_type)?;
                get_exact(src, length, data_type)?;
            }
            DataType::Array => {
                if let Some(length) = get_length(src, data_type)? {
                    check_elements(src, length)?;
                }
            }
            DataType::Set | DataType::Push => {
                let length = get_count(src, data_type)?;
                check_elements(src, length)?;
            }
            DataType::Map => {
                // A key and a value per entry.
                let length = get_count(src, data_type)?;
                check_elements(src, length.saturating_mul(2))?;
            }
        }

        Ok(())
    }

    /// Decodes exactly one frame from a complete buffer. Running out of bytes is a parse error
    /// here, since nothing more is going to arrive.
    pub fn decode(src: &[u8]) -> Result<Self, Error> {
        let mut cursor = Cursor::new(src);
        let frame = match Self::parse(&mut cursor) {
            Ok(frame) => frame,
            Err(Error::Incomplete) => return Err(truncated(src)),
            Err(err) => return Err(err),
        };

        let remaining = cursor.remaining();
        if remaining > 0 {
            return Err(parse_error(
                frame.data_type(),
                format!("{} trailing bytes after the frame", remaining),
            ));
        }

        Ok(frame)
    }

    /// Writes the wire representation of the frame, recursively for aggregates.
    pub fn write_to(&self, dst: &mut BytesMut) {
        match self {
            Frame::Simple(s) => write_line(dst, DataType::SimpleString, s.as_bytes()),
            Frame::Error(s) => write_line(dst, DataType::SimpleError, s.as_bytes()),
            Frame::Integer(i) => write_line(dst, DataType::Integer, i.to_string().as_bytes()),
            Frame::Bulk(data) => write_blob(dst, DataType::BulkString, data),
            Frame::Array(frames) => {
                write_line(dst, DataType::Array, frames.len().to_string().as_bytes());
                for frame in frames {
                    frame.write_to(dst);
                }
            }
            Frame::Null => write_line(dst, DataType::Null, b""),
            Frame::Boolean(b) => write_line(dst, DataType::Boolean, if *b { b"t" } else { b"f" }),
            Frame::Double(d) => write_line(dst, DataType::Double, format_double(*d).as_bytes()),
            Frame::BigNumber(n) => write_line(dst, DataType::BigNumber, n.to_string().as_bytes()),
            Frame::BulkError(data) => write_blob(dst, DataType::BulkError, data),
            Frame::Verbatim { format, text } => {
                let length = format.len() + 1 + text.len();
                write_line(dst, DataType::VerbatimString, length.to_string().as_bytes());
                dst.reserve(length + CRLF.len());
                dst.put_slice(format);
                dst.put_u8(VERBATIM_SEPARATOR);
                dst.put_slice(text.as_bytes());
                dst.put_slice(CRLF);
            }
            Frame::Map(entries) => {
                write_line(dst, DataType::Map, entries.len().to_string().as_bytes());
                for (key, value) in entries {
                    key.write_to(dst);
                    value.write_to(dst);
                }
            }
            Frame::Set(members) => {
                write_line(dst, DataType::Set, members.len().to_string().as_bytes());
                for member in members {
                    member.write_to(dst);
                }
            }
            Frame::Push(frames) => {
                write_line(dst, DataType::Push, frames.len().to_string().as_bytes());
                for frame in frames {
                    frame.write_to(dst);
                }
            }
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = BytesMut::new();
        self.write_to(&mut bytes);
        bytes.to_vec()
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Frame::Simple(_) => DataType::SimpleString,
            Frame::Error(_) => DataType::SimpleError,
            Frame::Integer(_) => DataType::Integer,
            Frame::Bulk(_) => DataType::BulkString,
            Frame::Array(_) => DataType::Array,
            Frame::Null => DataType::Null,
            Frame::Boolean(_) => DataType::Boolean,
            Frame::Double(_) => DataType::Double,
            Frame::BigNumber(_) => DataType::BigNumber,
            Frame::BulkError(_) => DataType::BulkError,
            Frame::Verbatim { .. } => DataType::VerbatimString,
            Frame::Map(_) => DataType::Map,
            Frame::Set(_) => DataType::Set,
            Frame::Push(_) => DataType::Push,
        }
    }

    /// The textual content of string-like frames. Bulk strings only qualify when they hold valid
    /// UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Frame::Simple(s) => Some(s),
            Frame::Bulk(bytes) => str::from_utf8(bytes).ok(),
            Frame::Verbatim { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Frame::Integer(i) => Some(*i),
            Frame::BigNumber(n) => n.to_i64(),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Frame::Error(_) | Frame::BulkError(_))
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Frame::Simple(a), Frame::Simple(b)) => a == b,
            (Frame::Error(a), Frame::Error(b)) => a == b,
            (Frame::Integer(a), Frame::Integer(b)) => a == b,
            (Frame::Bulk(a), Frame::Bulk(b)) => a == b,
            (Frame::Array(a), Frame::Array(b)) => a == b,
            (Frame::Null, Frame::Null) => true,
            (Frame::Boolean(a), Frame::Boolean(b)) => a == b,
            (Frame::Double(a), Frame::Double(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Frame::BigNumber(a), Frame::BigNumber(b)) => a == b,
            (Frame::BulkError(a), Frame::BulkError(b)) => a == b,
            (
                Frame::Verbatim { format, text },
                Frame::Verbatim {
                    format: other_format,
                    text: other_text,
                },
            ) => format == other_format && text == other_text,
            // Maps and sets are unordered on the wire.
            (Frame::Map(a), Frame::Map(b)) => unordered_eq(a, b),
            (Frame::Set(a), Frame::Set(b)) => unordered_eq(a, b),
            (Frame::Push(a), Frame::Push(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Frame> for Vec<u8> {
    fn from(frame: Frame) -> Self {
        frame.serialize()
    }
}

// Human readable rendering, meant for logs rather than the wire.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Simple(s) => write!(f, "+{}", s),
            Frame::Error(s) => write!(f, "-{}", s),
            Frame::Integer(i) => write!(f, ":{}", i),
            Frame::Bulk(bytes) => write!(f, "${}", String::from_utf8_lossy(bytes)),
            Frame::Null => write!(f, "_"),
            Frame::Boolean(b) => write!(f, "#{}", if *b { 't' } else { 'f' }),
            Frame::Double(d) => write!(f, ",{}", format_double(*d)),
            Frame::BigNumber(n) => write!(f, "({}", n),
            Frame::BulkError(bytes) => write!(f, "!{}", String::from_utf8_lossy(bytes)),
            Frame::Verbatim { format, text } => {
                write!(f, "={}:{}", String::from_utf8_lossy(format), text)
            }
            Frame::Array(frames) => write_aggregate(f, '*', frames),
            Frame::Set(frames) => write_aggregate(f, '~', frames),
            Frame::Push(frames) => write_aggregate(f, '>', frames),
            Frame::Map(entries) => {
                write!(f, "%[")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", key, value)?;
                }
                write!(f, "]")
            }
        }
    }
}

fn write_aggregate(f: &mut fmt::Formatter<'_>, prefix: char, frames: &[Frame]) -> fmt::Result {
    write!(f, "{}[", prefix)?;
    for (i, frame) in frames.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", frame)?;
    }
    write!(f, "]")
}

fn parse_elements(src: &mut Cursor<&[u8]>, length: usize) -> Result<Vec<Frame>, Error> {
    let mut frames = Vec::with_capacity(length.min(MAX_PREALLOCATED_ELEMENTS));
    for _ in 0..length {
        frames.push(Frame::parse(src)?);
    }

    Ok(frames)
}

fn check_elements(src: &mut Cursor<&[u8]>, length: usize) -> Result<(), Error> {
    for _ in 0..length {
        Frame::check(src)?;
    }

    Ok(())
}

// Keeps the first occurrence of each member. Members are keyed by their wire form.
fn dedup_members(members: Vec<Frame>) -> Vec<Frame> {
    let mut seen = HashSet::with_capacity(members.len());
    members
        .into_iter()
        .filter(|member| seen.insert(member.serialize()))
        .collect()
}

// Compares two collections as multisets: every item needs its own match on the other side.
fn unordered_eq<T: PartialEq>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut matched = vec![false; b.len()];
    a.iter().all(|item| {
        let found = b
            .iter()
            .zip(matched.iter_mut())
            .find(|(other, used)| !**used && item == *other);

        match found {
            Some((_, used)) => {
                *used = true;
                true
            }
            None => false,
        }
    })
}

/// Reads up to the next CR and requires it to be followed by LF. Returns the bytes before the CR
/// and leaves the cursor after the LF.
fn get_line<'a>(src: &mut Cursor<&'a [u8]>, data_type: DataType) -> Result<&'a [u8], Error> {
    let start = src.position() as usize;
    let buf: &'a [u8] = *src.get_ref();

    let cr_position = buf
        .get(start..)
        .and_then(|rest| rest.iter().position(|&byte| byte == CR))
        .map(|index| start + index)
        .ok_or(Error::Incomplete)?;

    match buf.get(cr_position + 1) {
        None => Err(Error::Incomplete),
        Some(&LF) => {
            src.set_position((cr_position + CRLF.len()) as u64);
            Ok(&buf[start..cr_position])
        }
        Some(&other) => Err(unexpected_terminator(data_type, LF, "LF", other)),
    }
}

/// Reads exactly `length` bytes followed by CRLF. Terminator bytes are checked as soon as they
/// are available so a wrong declared length fails fast instead of waiting for more data.
fn get_exact<'a>(
    src: &mut Cursor<&'a [u8]>,
    length: usize,
    data_type: DataType,
) -> Result<&'a [u8], Error> {
    let start = src.position() as usize;
    let buf: &'a [u8] = *src.get_ref();
    let end = start
        .checked_add(length)
        .ok_or_else(|| parse_error(data_type, format!("declared length {} overflows", length)))?;

    match buf.get(end) {
        None => return Err(Error::Incomplete),
        Some(&CR) => {}
        Some(&other) => return Err(unexpected_terminator(data_type, CR, "CR", other)),
    }
    match buf.get(end + 1) {
        None => return Err(Error::Incomplete),
        Some(&LF) => {}
        Some(&other) => return Err(unexpected_terminator(data_type, LF, "LF", other)),
    }

    src.set_position((end + CRLF.len()) as u64);
    Ok(&buf[start..end])
}

/// Reads a length prefix. `-1` is the RESP2 null sentinel and is returned as `None`.
fn get_length(src: &mut Cursor<&[u8]>, data_type: DataType) -> Result<Option<usize>, Error> {
    let line = get_line(src, data_type)?;
    let length = parse_text::<i64>(line, data_type)?;

    match length {
        -1 => Ok(None),
        length if length < 0 => Err(parse_error(
            data_type,
            format!("invalid negative length {}", length),
        )),
        length => usize::try_from(length)
            .map(Some)
            .map_err(|_| parse_error(data_type, format!("length {} is too large", length))),
    }
}

/// Reads a length prefix for types that have no null representation.
fn get_count(src: &mut Cursor<&[u8]>, data_type: DataType) -> Result<usize, Error> {
    get_length(src, data_type)?
        .ok_or_else(|| parse_error(data_type, "null length is not allowed".to_string()))
}

fn get_byte(src: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    if !src.has_remaining() {
        return Err(Error::Incomplete);
    }
    Ok(src.get_u8())
}

fn to_string(bytes: &[u8], data_type: DataType) -> Result<String, Error> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| parse_error(data_type, "invalid UTF-8 payload".to_string()))
}

fn parse_text<T: FromStr>(bytes: &[u8], data_type: DataType) -> Result<T, Error> {
    let text = str::from_utf8(bytes)
        .map_err(|_| parse_error(data_type, "invalid UTF-8 payload".to_string()))?;

    text.parse::<T>()
        .map_err(|_| parse_error(data_type, format!("invalid number {:?}", text)))
}

fn write_line(dst: &mut BytesMut, data_type: DataType, payload: &[u8]) {
    dst.reserve(1 + payload.len() + CRLF.len());
    dst.put_u8(u8::from(data_type));
    dst.put_slice(payload);
    dst.put_slice(CRLF);
}

fn write_blob(dst: &mut BytesMut, data_type: DataType, data: &[u8]) {
    write_line(dst, data_type, data.len().to_string().as_bytes());
    dst.reserve(data.len() + CRLF.len());
    dst.put_slice(data);
    dst.put_slice(CRLF);
}

// The wire format only knows these exact spellings for the special values.
fn format_double(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        value.to_string()
    }
}

fn parse_error(data_type: DataType, message: String) -> Error {
    Error::Parse { data_type, message }
}

fn truncated(src: &[u8]) -> Error {
    let Some(&first_byte) = src.first() else {
        return Error::Incomplete;
    };

    match DataType::try_from(first_byte) {
        Ok(data_type) => parse_error(
            data_type,
            "frame is truncated, expected CR (13) before the end of the input".to_string(),
        ),
        Err(err) => err,
    }
}

fn unexpected_terminator(data_type: DataType, expected: u8, name: &str, found: u8) -> Error {
    parse_error(
        data_type,
        format!("expected {} ({}) but found {}", name, expected, found),
    )
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum DataType {
    SimpleString,   // '+'
    BulkString,     // '$'
    VerbatimString, // '='
    SimpleError,    // '-'
    BulkError,      // '!'
    Boolean,        // '#'
    Integer,        // ':'
    Double,         // ','
    BigNumber,      // '('
    Array,          // '*'
    Map,            // '%'
    Set,            // '~'
    Push,           // '>'
    // Due to historical reasons, RESP2 features two specially crafted values for representing null
    // values of bulk strings and arrays. This duality has always been a redundancy that added zero
    // semantical value to the protocol itself. The null type, introduced in RESP3, aims to fix
    // this wrong.
    Null, // '_'
}

impl TryFrom<u8> for DataType {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            b'+' => Ok(Self::SimpleString),
            b'-' => Ok(Self::SimpleError),
            b':' => Ok(Self::Integer),
            b'$' => Ok(Self::BulkString),
            b'!' => Ok(Self::BulkError),
            b'*' => Ok(Self::Array),
            b'_' => Ok(Self::Null),
            b'#' => Ok(Self::Boolean),
            b',' => Ok(Self::Double),
            b'(' => Ok(Self::BigNumber),
            b'=' => Ok(Self::VerbatimString),
            b'%' => Ok(Self::Map),
            b'~' => Ok(Self::Set),
            b'>' => Ok(Self::Push),
            _ => Err(Error::InvalidDataType(byte)),
        }
    }
}

impl From<DataType> for u8 {
    fn from(value: DataType) -> Self {
        match value {
            DataType::SimpleString => b'+',
            DataType::SimpleError => b'-',
            DataType::Integer => b':',
            DataType::BulkString => b'$',
            DataType::BulkError => b'!',
            DataType::Array => b'*',
            DataType::Null => b'_',
            DataType::Boolean => b'#',
            DataType::Double => b',',
            DataType::BigNumber => b'(',
            DataType::VerbatimString => b'=',
            DataType::Map => b'%',
            DataType::Set => b'~',
            DataType::Push => b'>',
        }
    }
}
