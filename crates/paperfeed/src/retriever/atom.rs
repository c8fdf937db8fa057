//! Parser for the Atom feeds returned by the arXiv query API.
//!
//! Only the parts of the feed that end up in a [`Paper`] are read. Namespace prefixes are ignored,
//! so `<arxiv:primary_category>` and `<opensearch:totalResults>` are matched by their local names.
//!
//! ```xml
//! <feed xmlns="http://www.w3.org/2005/Atom">
//!   <opensearch:totalResults>1</opensearch:totalResults>
//!   <entry>
//!     <id>http://arxiv.org/abs/2412.12345v1</id>
//!     <published>2024-12-16T18:59:59Z</published>
//!     <title>A Paper Title</title>
//!     <summary>The abstract.</summary>
//!     <author><name>Alice</name></author>
//!     <link title="pdf" href="http://arxiv.org/pdf/2412.12345v1" rel="related"/>
//!     <category term="cs.CR"/>
//!   </entry>
//! </feed>
//! ```

use quick_xml::{
  events::{BytesStart, Event},
  Reader,
};

use super::*;

/// One page of search results.
#[derive(Debug, Clone, Default)]
pub struct Feed {
  /// Total number of matches reported by the service, across all pages
  pub total_results: Option<usize>,
  /// Entries on this page, in feed order
  pub entries:       Vec<Entry>,
}

/// Raw metadata of one search result.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
  /// Canonical identifier URI, e.g. `http://arxiv.org/abs/2412.12345v1`
  pub id:         String,
  /// Title as sent, possibly spanning several lines
  pub title:      String,
  /// Abstract as sent, possibly spanning several lines
  pub summary:    String,
  /// Submission timestamp of the first version
  pub published:  DateTime<Utc>,
  /// All author names
  pub authors:    Vec<String>,
  /// Category terms, in feed order
  pub categories: Vec<String>,
  /// Link marked with `title="pdf"`, if any
  pub pdf_url:    Option<String>,
}

/// Fields of an entry collected while its element is open.
#[derive(Debug, Default)]
struct PartialEntry {
  /// Text of `<id>`
  id:         String,
  /// Text of `<title>`
  title:      String,
  /// Text of `<summary>`
  summary:    String,
  /// Text of `<published>`
  published:  String,
  /// One name per `<author>`
  authors:    Vec<String>,
  /// `term` attribute of every `<category>`
  categories: Vec<String>,
  /// `href` of the PDF link
  pdf_url:    Option<String>,
}

/// Parses an arXiv Atom response.
///
/// arXiv reports a malformed query as a feed with a single entry whose id lies under
/// `/api/errors`; such a feed becomes [`FeedError::ApiError`] with the entry's summary as message.
pub fn parse_feed(xml: &str) -> Result<Feed> {
  let mut reader = Reader::from_str(xml);
  let mut feed = Feed::default();
  let mut path: Vec<String> = Vec::new();
  let mut current: Option<PartialEntry> = None;

  loop {
    match reader.read_event()? {
      Event::Start(e) => {
        let name = local_name(&e);
        if name == "entry" {
          current = Some(PartialEntry::default());
        }
        if let Some(entry) = current.as_mut() {
          entry.open(&name, &e)?;
        }
        path.push(name);
      },
      Event::Empty(e) =>
        if let Some(entry) = current.as_mut() {
          entry.open(&local_name(&e), &e)?;
        },
      Event::Text(e) => {
        let text = e.unescape()?;
        match current.as_mut() {
          Some(entry) => entry.text(&path, &text),
          None if path.last().map(String::as_str) == Some("totalResults") =>
            feed.total_results = text.trim().parse().ok(),
          None => {},
        }
      },
      Event::CData(e) =>
        if let Some(entry) = current.as_mut() {
          entry.text(&path, &String::from_utf8_lossy(&e.into_inner()));
        },
      Event::End(_) =>
        if path.pop().as_deref() == Some("entry") {
          if let Some(entry) = current.take() {
            feed.entries.push(entry.finish()?);
          }
        },
      Event::Eof => break,
      _ => {},
    }
  }

  trace!("Parsed feed with {} entries", feed.entries.len());
  Ok(feed)
}

/// Element name without its namespace prefix.
fn local_name(e: &BytesStart) -> String {
  String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

impl PartialEntry {
  /// Handles an opening (or self-closing) element inside the entry.
  fn open(&mut self, name: &str, e: &BytesStart) -> Result<()> {
    match name {
      "author" => self.authors.push(String::new()),
      "category" =>
        if let Some(term) = attribute(e, "term")? {
          self.categories.push(term);
        },
      "link" =>
        if attribute(e, "title")?.as_deref() == Some("pdf") {
          self.pdf_url = attribute(e, "href")?;
        },
      _ => {},
    }
    Ok(())
  }

  /// Appends text found at `path` to the matching field.
  fn text(&mut self, path: &[String], text: &str) {
    let field = match path {
      [.., parent, name] if parent == "entry" => match name.as_str() {
        "id" => &mut self.id,
        "title" => &mut self.title,
        "summary" => &mut self.summary,
        "published" => &mut self.published,
        _ => return,
      },
      [.., parent, name] if parent == "author" && name == "name" => match self.authors.last_mut() {
        Some(author) => author,
        None => return,
      },
      _ => return,
    };
    field.push_str(text);
  }

  /// Checks the collected fields and converts them.
  fn finish(self) -> Result<Entry> {
    let id = self.id.trim().to_string();
    if id.is_empty() {
      return Err(FeedError::MissingField("id"));
    }
    if id.contains("/api/errors") {
      return Err(FeedError::ApiError(normalize_text(&self.summary)));
    }
    if self.published.trim().is_empty() {
      return Err(FeedError::MissingField("published date"));
    }
    let published = DateTime::parse_from_rfc3339(self.published.trim())
      .map_err(|e| FeedError::InvalidDate(format!("{}: {e}", self.published.trim())))?
      .with_timezone(&Utc);

    Ok(Entry {
      id,
      title: self.title,
      summary: self.summary,
      published,
      authors: self.authors.into_iter().map(|name| name.trim().to_string()).collect(),
      categories: self.categories,
      pdf_url: self.pdf_url,
    })
  }
}

/// Unescaped value of the attribute `key`, if present.
fn attribute(e: &BytesStart, key: &str) -> Result<Option<String>> {
  for attr in e.attributes() {
    let attr = attr?;
    if attr.key.local_name().as_ref() == key.as_bytes() {
      return Ok(Some(attr.unescape_value()?.into_owned()));
    }
  }
  Ok(None)
}

impl Entry {
  /// The identifier used by the store: the last path segment of the id URI.
  pub fn short_id(&self) -> Result<String> {
    let url = Url::parse(&self.id).map_err(|_| FeedError::InvalidIdentifier(self.id.clone()))?;
    url
      .path_segments()
      .and_then(|mut segments| segments.next_back())
      .filter(|segment| !segment.is_empty())
      .map(String::from)
      .ok_or_else(|| FeedError::InvalidIdentifier(self.id.clone()))
  }

  /// Maps this entry onto a stored record with an empty summary.
  ///
  /// Titles and abstracts are flattened to one line, only the first [`MAX_AUTHORS`] authors are
  /// kept, and a missing PDF link is derived from the abstract page URI.
  pub fn into_paper(self) -> Result<Paper> {
    let id = self.short_id()?;
    let pdf_link = self.pdf_url.unwrap_or_else(|| self.id.replacen("/abs/", "/pdf/", 1));
    Ok(Paper {
      id,
      title: normalize_text(&self.title),
      authors: self.authors.into_iter().take(MAX_AUTHORS).collect(),
      published_date: self.published.date_naive(),
      tags: self.categories,
      link: self.id,
      pdf_link,
      content: Content { en: normalize_text(&self.summary), tr: String::new() },
    })
  }
}
