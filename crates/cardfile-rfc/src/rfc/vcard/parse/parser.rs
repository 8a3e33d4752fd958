//! vCard document parser.

use std::io::Read;
use std::path::Path;

use cardfile_core::config::ParserConfig;
use cardfile_core::constants::{ALTID_KEY, ENCODING_KEY, TYPE_KEY, VALUE_KEY};

use super::convert::{self, Converted, ValueContext};
use super::error::{ParseError, ParseErrorKind, ParseResult};
use super::lexer::{ContentLine, parse_content_line, property_name, split_head};
use super::lines::{LogicalLine, RawRecord, split_records};
use super::validate::validate;
use super::values::decode_quoted_printable;
use crate::error::{VCardError, VCardResult};
use crate::rfc::vcard::core::{
    AgentInfo, Argument, Card, FieldKind, Part, PartMeta, PartValue, VCardVersion, names,
};
use crate::rfc::vcard::policy::{Converter, PropertyDescriptor, altid, capability, registry};

/// Engine switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Run the required-field check on every card.
    pub validate: bool,
    /// File properties unsupported by the card's version as extensions
    /// instead of dropping them.
    pub keep_unsupported: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            validate: true,
            keep_unsupported: false,
        }
    }
}

impl From<ParserConfig> for ParseOptions {
    fn from(config: ParserConfig) -> Self {
        Self {
            validate: config.validate,
            keep_unsupported: config.keep_unsupported,
        }
    }
}

/// Parses a vCard document into one or more cards.
///
/// ## Summary
/// Parses the input string with default options and returns all cards found.
///
/// ## Errors
/// Returns a parse error if the document is malformed or contains invalid
/// property values, and a validation error if a card lacks required
/// properties.
pub fn parse_cards(input: &str) -> VCardResult<Vec<Card>> {
    parse_cards_with(input, ParseOptions::default())
}

/// Parses a vCard document with explicit options.
///
/// ## Errors
/// See [`parse_cards`].
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse_cards_with(input: &str, options: ParseOptions) -> VCardResult<Vec<Card>> {
    tracing::debug!("Parsing vCard document");

    let records = split_records(input)?;
    tracing::trace!(count = records.len(), "Split records");

    let cards = records
        .into_iter()
        .map(|record| Parser::new(record, options).parse_card())
        .collect::<VCardResult<Vec<_>>>()?;

    tracing::debug!(count = cards.len(), "Parsed vCards");
    Ok(cards)
}

/// Parses a single card from input.
///
/// ## Summary
/// Convenience function for documents holding exactly one card; later
/// cards are parsed and discarded.
///
/// ## Errors
/// Returns an error if the document contains no cards or is malformed.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse_single(input: &str) -> VCardResult<Card> {
    tracing::debug!("Parsing single vCard");

    let cards = parse_cards(input)?;
    if cards.len() > 1 {
        tracing::debug!(count = cards.len(), "Ignoring cards after the first");
    }
    cards.into_iter().next().ok_or_else(|| {
        tracing::warn!("No vCard found in document");
        ParseError::structural(ParseErrorKind::EmptyInput, 1, "no vCard found in document")
            .into()
    })
}

/// Reads `reader` to the end and parses it.
///
/// ## Errors
/// Returns an I/O error if reading fails (including invalid UTF-8), or any
/// error of [`parse_cards`].
pub fn parse_reader(reader: impl Read) -> VCardResult<Vec<Card>> {
    parse_reader_with(reader, ParseOptions::default())
}

/// Reads `reader` to the end and parses it with explicit options.
///
/// ## Errors
/// See [`parse_reader`].
pub fn parse_reader_with(mut reader: impl Read, options: ParseOptions) -> VCardResult<Vec<Card>> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    parse_cards_with(&input, options)
}

/// Parses the file at `path`.
///
/// ## Errors
/// Returns an I/O error if the file cannot be opened or read, or any error
/// of [`parse_cards`].
pub fn parse_file(path: impl AsRef<Path>) -> VCardResult<Vec<Card>> {
    parse_file_with(path, ParseOptions::default())
}

/// Parses the file at `path` with explicit options.
///
/// ## Errors
/// See [`parse_file`].
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn parse_file_with(path: impl AsRef<Path>, options: ParseOptions) -> VCardResult<Vec<Card>> {
    let file = std::fs::File::open(path.as_ref())?;
    parse_reader_with(std::io::BufReader::new(file), options)
}

/// Builds one card from one record.
struct Parser {
    version: VCardVersion,
    begin_line: usize,
    lines: Vec<LogicalLine>,
    options: ParseOptions,
    /// KIND value, read ahead of time so MEMBER can be gated wherever it appears.
    card_kind: Option<String>,
    card: Card,
}

impl Parser {
    fn new(record: RawRecord, options: ParseOptions) -> Self {
        let card_kind = record
            .lines
            .iter()
            .find(|line| {
                property_name(&line.text).is_some_and(|name| name.eq_ignore_ascii_case(names::KIND))
            })
            .and_then(|line| split_head(&line.text))
            .map(|(_, value)| value.trim().to_string());

        Self {
            version: record.version,
            begin_line: record.begin_line,
            lines: record.lines,
            options,
            card_kind,
            card: Card::new(record.version),
        }
    }

    fn parse_card(mut self) -> VCardResult<Card> {
        let lines = std::mem::take(&mut self.lines);
        for line in &lines {
            let content = parse_content_line(line, self.version)?;
            self.process(line, content)?;
        }

        if self.options.validate {
            validate(&self.card, self.begin_line)?;
        }

        tracing::trace!(
            version = %self.version,
            line = self.begin_line,
            "Parsed card"
        );
        Ok(self.card)
    }

    fn process(&mut self, line: &LogicalLine, mut content: ContentLine) -> VCardResult<()> {
        let with_line = |err: ParseError| err.with_raw_line(line.text.as_str());

        let mut descriptor = registry::lookup(&content.name);
        let mut support =
            capability::support(descriptor.field, self.version, self.card_kind.as_deref());

        if !support.is_supported() {
            if !self.options.keep_unsupported {
                tracing::debug!(
                    property = %content.name,
                    version = %self.version,
                    line = content.line,
                    "Dropping property unsupported for version"
                );
                return Ok(());
            }
            tracing::debug!(
                property = %content.name,
                version = %self.version,
                "Keeping unsupported property as extension"
            );
            descriptor = registry::extension();
            support = capability::support(descriptor.field, self.version, None);
        }

        let alt_id =
            altid::resolve(&content.name, &content.args, support, content.line).map_err(with_line)?;
        let raw = decode_transfer(&mut content, descriptor).map_err(with_line)?;
        let meta = self.build_meta(&content, descriptor, alt_id);

        let ctx = ValueContext {
            property: &content.name,
            line: content.line,
            version: self.version,
            value_type: &meta.value_type,
            encoded: content.argument(ENCODING_KEY).is_some(),
        };

        let converted = if descriptor.converter == Converter::Agent {
            self.convert_agent(line, &content, descriptor, &raw, &ctx)?
        } else {
            convert::convert(descriptor, &raw, &ctx).map_err(with_line)?
        };

        self.file(descriptor, &content, meta, converted);
        Ok(())
    }

    fn build_meta(
        &self,
        content: &ContentLine,
        descriptor: &PropertyDescriptor,
        alt_id: Option<u32>,
    ) -> PartMeta {
        let element_types = content
            .argument_values(TYPE_KEY)
            .into_iter()
            .filter(|t| !t.eq_ignore_ascii_case(descriptor.default_type))
            .inspect(|t| {
                if descriptor.converter != Converter::Extension && !descriptor.knows_type(t) {
                    tracing::warn!(
                        property = %content.name,
                        line = content.line,
                        type_value = %t,
                        "Unknown TYPE value"
                    );
                }
            })
            .map(str::to_string)
            .collect();

        let value_type = content
            .argument(VALUE_KEY)
            .map_or_else(|| descriptor.value_for(self.version).to_string(), str::to_string);

        let arguments = content
            .args
            .iter()
            .filter(|a| !(a.is(TYPE_KEY) || a.is(VALUE_KEY) || a.is(ALTID_KEY)))
            .cloned()
            .collect();

        PartMeta {
            alt_id,
            element_types,
            value_type,
            group: content.group.clone(),
            arguments,
        }
    }

    /// Parses an embedded AGENT card, or falls back to a reference.
    fn convert_agent(
        &self,
        line: &LogicalLine,
        content: &ContentLine,
        descriptor: &PropertyDescriptor,
        raw: &str,
        ctx: &ValueContext<'_>,
    ) -> VCardResult<Converted> {
        let Some(text) = convert::embedded_agent(raw, content.nested.as_deref(), ctx) else {
            return convert::convert(descriptor, raw, ctx)
                .map_err(|err| err.with_raw_line(line.text.as_str()).into());
        };

        tracing::debug!(line = content.line, "Parsing embedded AGENT card");
        let cards = parse_cards_with(&text, self.options).map_err(|err| match err {
            VCardError::Parse(err) => {
                VCardError::Parse(err.relocate(content.line, line.text.as_str()))
            }
            other => other,
        })?;

        Ok(Converted::Part(PartValue::Agent(AgentInfo { cards, uri: None })))
    }

    fn file(
        &mut self,
        descriptor: &PropertyDescriptor,
        content: &ContentLine,
        meta: PartMeta,
        converted: Converted,
    ) {
        match (descriptor.field, converted) {
            (FieldKind::Scalar(kind), Converted::Scalar(text)) => {
                if !self.card.set_scalar(kind, text) {
                    tracing::warn!(
                        property = %content.name,
                        line = content.line,
                        "Repeated property ignored, first value kept"
                    );
                }
            }
            (FieldKind::Repeatable(kind), Converted::Part(value)) => {
                self.card.push_part(kind, Part { meta, value });
            }
            (FieldKind::Singleton(kind), Converted::Part(value)) => {
                if !self.card.set_singleton(kind, Part { meta, value }) {
                    tracing::warn!(
                        property = %content.name,
                        line = content.line,
                        "Duplicate property ignored, first value kept"
                    );
                }
            }
            (field, converted) => {
                tracing::error!(?field, ?converted, "Converter output does not fit its field");
            }
        }
    }
}

/// Takes the raw value, decoding vCard 2.1 quoted-printable text.
///
/// The ENCODING argument that declared quoted-printable is removed; media
/// payloads are never decoded here.
fn decode_transfer(content: &mut ContentLine, descriptor: &PropertyDescriptor) -> ParseResult<String> {
    let is_qp = |a: &Argument| a.is(ENCODING_KEY) && a.has_value("QUOTED-PRINTABLE");

    if matches!(descriptor.converter, Converter::Media | Converter::Key)
        || !content.args.iter().any(is_qp)
    {
        return Ok(std::mem::take(&mut content.value));
    }

    content.args.retain(|a| !is_qp(a));
    decode_quoted_printable(&content.value, content.line)
}
