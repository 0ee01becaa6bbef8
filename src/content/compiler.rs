//! MDX compilation: markdown with embedded components, heading ids and
//! syntax highlighting

use indexmap::IndexMap;
use lazy_static::lazy_static;
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::ops::Range;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::components::ComponentRegistry;
use crate::error::CompileError;
use crate::helpers::escape_html;

/// Placeholder delimiters, from the private use area so markdown leaves them alone
const MARKER_OPEN: char = '\u{E000}';
const MARKER_CLOSE: char = '\u{E001}';

lazy_static! {
    /// Placeholder left in the markdown where a component tag stood
    static ref MARKER: Regex = Regex::new("\u{E000}([0-9]+)\u{E001}").unwrap();

    /// A paragraph holding nothing but placeholders, i.e. block-level tags
    static ref MARKER_PARAGRAPH: Regex =
        Regex::new("<p>((?:\\s*\u{E000}[0-9]+\u{E001})+)\\s*</p>\n?").unwrap();
}

/// Value of a component attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropValue {
    /// `name="value"` or `name='value'`
    Str(String),
    /// `name={expression}`, kept as source text
    Expr(String),
    /// bare `name`
    Flag,
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) | PropValue::Expr(s) => Some(s),
            PropValue::Flag => None,
        }
    }
}

pub type Props = IndexMap<String, PropValue>;

/// An embedded component invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentNode {
    pub name: String,
    pub props: Props,
    pub children: Vec<Node>,
}

impl ComponentNode {
    /// String value of a prop
    pub fn prop(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(PropValue::as_str)
    }
}

/// A node of the compiled tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Rendered markdown
    Html(String),
    Component(ComponentNode),
}

/// A heading with its anchor id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub id: String,
    pub text: String,
}

/// Result of compiling a document body; rendering happens elsewhere
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledDocument {
    pub nodes: Vec<Node>,
    pub headings: Vec<Heading>,
}

impl CompiledDocument {
    /// Names of all components used, in document order, repeated as invoked
    pub fn component_names(&self) -> Vec<&str> {
        fn collect<'a>(nodes: &'a [Node], out: &mut Vec<&'a str>) {
            for node in nodes {
                if let Node::Component(c) = node {
                    out.push(&c.name);
                    collect(&c.children, out);
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.nodes, &mut out);
        out
    }
}

/// MDX compiler with syntax highlighting
pub struct MdxCompiler {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
    highlight: bool,
}

impl MdxCompiler {
    /// Create a new compiler
    pub fn new() -> Self {
        Self::with_options("InspiredGitHub", false, true)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool, highlight: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
            highlight,
        }
    }

    /// Compile a document body against the components allowed for its collection.
    ///
    /// Invoking a component missing from `registry` fails the whole document.
    /// Component tags are lifted out of the source first, the markdown is
    /// rendered in one pass, and the HTML is split back at the tags.
    pub fn compile(
        &self,
        body: &str,
        registry: &ComponentRegistry,
    ) -> Result<CompiledDocument, CompileError> {
        // YAML metadata blocks stay off: front-matter is split off beforehand
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;

        let body = body.replace([MARKER_OPEN, MARKER_CLOSE], "");
        let code = code_ranges(&body, options);
        let (source, tags) = extract_tags(&body, &code, registry)?;

        let events: Vec<Event> =
            TextMergeStream::new(Parser::new_ext(&source, options)).collect();
        let (events, headings) = assign_heading_ids(events);
        let events = if self.highlight {
            self.highlight_code_blocks(events)
        } else {
            events
        };

        let mut rendered = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut rendered, events.into_iter());
        let nodes = build_tree(&rendered, &tags)?;

        Ok(CompiledDocument { nodes, headings })
    }

    /// Replace fenced and indented code blocks with highlighted HTML
    fn highlight_code_blocks<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut out = Vec::with_capacity(events.len());
        let mut code_block_lang: Option<Option<String>> = None;
        let mut code_block_content = String::new();

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code_block_lang = Some(lang);
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(lang) = code_block_lang.take() {
                        let highlighted = self.highlight_code(&code_block_content, lang.as_deref());
                        out.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block_lang.is_some() => {
                    code_block_content.push_str(&text);
                }
                other => out.push(other),
            }
        }

        out
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = theme.and_then(|theme| {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
        });

        match highlighted {
            Some(highlighted) if self.line_numbers => add_line_numbers(&highlighted, lang),
            Some(highlighted) => format!(
                r#"<div class="highlight language-{}">{}</div>"#,
                lang, highlighted
            ),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang,
                escape_html(code)
            ),
        }
    }
}

impl Default for MdxCompiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Add line numbers to highlighted code
fn add_line_numbers(code: &str, lang: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();
    let gutter: Vec<String> = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect();

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        lang,
        gutter.join("\n"),
        lines.join("\n")
    )
}

/// Anchor id for a heading text: lowercased, whitespace to `-`, punctuation dropped.
/// Letters of any script are kept.
pub fn heading_slug(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('-')
            } else if c.is_alphanumeric() || c == '-' || c == '_' {
                Some(c)
            } else {
                None
            }
        })
        .collect()
}

/// Hands out unique heading ids within one document
#[derive(Default)]
struct HeadingSlugger {
    seen: HashSet<String>,
    counts: HashMap<String, usize>,
}

impl HeadingSlugger {
    fn reserve(&mut self, id: &str) {
        self.seen.insert(id.to_string());
    }

    fn slug(&mut self, text: &str) -> String {
        let mut base = heading_slug(text);
        if base.is_empty() {
            base = "section".to_string();
        }

        let mut id = base.clone();
        while self.seen.contains(&id) {
            let n = self.counts.entry(base.clone()).or_insert(0);
            *n += 1;
            id = format!("{}-{}", base, n);
        }
        self.seen.insert(id.clone());
        id
    }
}

/// Give every heading an id and collect the outline.
///
/// Ids written by the author (`## Title {#id}`) are kept and reserved first.
fn assign_heading_ids(events: Vec<Event<'_>>) -> (Vec<Event<'_>>, Vec<Heading>) {
    let mut slugger = HeadingSlugger::default();
    for event in &events {
        if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
            slugger.reserve(id);
        }
    }

    let mut out = Vec::with_capacity(events.len());
    let mut headings = Vec::new();
    let mut open: Option<(usize, u8)> = None;
    let mut text = String::new();

    for event in events {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                open = Some((out.len(), level as u8));
                text.clear();
                out.push(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }));
            }
            Event::End(TagEnd::Heading(level)) => {
                if let Some((idx, lvl)) = open.take() {
                    let heading_text = MARKER.replace_all(&text, "").trim().to_string();
                    if let Event::Start(Tag::Heading { id, .. }) = &mut out[idx] {
                        let resolved = match id {
                            Some(existing) => existing.to_string(),
                            None => slugger.slug(&heading_text),
                        };
                        *id = Some(CowStr::from(resolved.clone()));
                        headings.push(Heading {
                            level: lvl,
                            id: resolved,
                            text: heading_text,
                        });
                    }
                }
                out.push(Event::End(TagEnd::Heading(level)));
            }
            other => {
                if open.is_some() {
                    if let Event::Text(t) | Event::Code(t) = &other {
                        text.push_str(t);
                    }
                }
                out.push(other);
            }
        }
    }

    (out, headings)
}

/// A component tag lifted out of the markdown source
#[derive(Debug, Clone, PartialEq, Eq)]
enum TagToken {
    Open {
        name: String,
        props: Props,
        self_closing: bool,
    },
    Close {
        name: String,
    },
}

impl TagToken {
    fn name(&self) -> &str {
        match self {
            TagToken::Open { name, .. } | TagToken::Close { name } => name,
        }
    }
}

/// Byte ranges of fenced code blocks and code spans, where tags are plain text.
///
/// Indentation alone does not make code here, as in MDX.
fn code_ranges(body: &str, options: Options) -> Vec<Range<usize>> {
    Parser::new_ext(body, options)
        .into_offset_iter()
        .filter_map(|(event, range)| match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))) | Event::Code(_) => {
                Some(range)
            }
            _ => None,
        })
        .collect()
}

/// Replace every component tag outside code with a numbered placeholder.
///
/// A tag indented four or more columns at the start of its line loses the
/// indentation, so nested tags never turn into indented code.
fn extract_tags(
    body: &str,
    code: &[Range<usize>],
    registry: &ComponentRegistry,
) -> Result<(String, Vec<TagToken>), CompileError> {
    let mut out = String::with_capacity(body.len());
    let mut tags = Vec::new();
    let mut copied = 0;
    let mut pos = 0;
    let mut next_code = 0;

    while let Some(offset) = body[pos..].find('<') {
        let start = pos + offset;

        while next_code < code.len() && code[next_code].end <= start {
            next_code += 1;
        }
        if let Some(range) = code.get(next_code).filter(|r| r.start <= start) {
            pos = range.end;
            continue;
        }

        let Some(name) = tag_name_at(&body[start..]) else {
            pos = start + 1;
            continue;
        };
        if !registry.contains(name) {
            return Err(CompileError::UnregisteredComponent {
                name: name.to_string(),
            });
        }
        let (token, len) =
            parse_tag(&body[start..]).ok_or_else(|| CompileError::MalformedComponent {
                name: name.to_string(),
            })?;

        let before = &body[copied..start];
        let line_start = match before.rfind('\n') {
            Some(nl) => Some(nl + 1),
            None if copied == 0 => Some(0),
            None => None,
        };
        let keep = match line_start {
            Some(ls) if before[ls..].trim().is_empty() && indent_width(&before[ls..]) >= 4 => {
                ls
            }
            _ => before.len(),
        };
        out.push_str(&before[..keep]);
        out.push(MARKER_OPEN);
        out.push_str(&tags.len().to_string());
        out.push(MARKER_CLOSE);
        tags.push(token);

        pos = start + len;
        copied = pos;
    }

    out.push_str(&body[copied..]);
    Ok((out, tags))
}

fn indent_width(prefix: &str) -> usize {
    prefix.chars().map(|c| if c == '\t' { 4 } else { 1 }).sum()
}

/// Name of the component tag starting at `s`, if `s` starts one.
///
/// Capitalized names are components, lowercase ones plain HTML.
fn tag_name_at(s: &str) -> Option<&str> {
    let rest = s.strip_prefix('<')?;
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    if !rest.starts_with(|c: char| c.is_ascii_uppercase()) {
        return None;
    }
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'))
        .unwrap_or(rest.len());
    match rest[end..].chars().next() {
        None | Some('>') | Some('/') => Some(&rest[..end]),
        Some(c) if c.is_whitespace() => Some(&rest[..end]),
        _ => None,
    }
}

/// Read one tag at the start of `s`, returning it with its byte length
fn parse_tag(s: &str) -> Option<(TagToken, usize)> {
    let mut cur = Cursor::new(s);
    cur.eat("<");
    let closing = cur.eat("/");
    let name = cur
        .take_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        .to_string();

    if closing {
        cur.skip_whitespace();
        return cur.eat(">").then(|| (TagToken::Close { name }, cur.pos));
    }

    let mut props = Props::new();
    loop {
        cur.skip_whitespace();
        if cur.eat("/>") {
            let token = TagToken::Open {
                name,
                props,
                self_closing: true,
            };
            return Some((token, cur.pos));
        }
        if cur.eat(">") {
            let token = TagToken::Open {
                name,
                props,
                self_closing: false,
            };
            return Some((token, cur.pos));
        }
        if cur.peek() == Some('{') {
            // spread attributes carry nothing static
            cur.braced()?;
            continue;
        }

        let key = cur
            .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
            .to_string();
        if key.is_empty() {
            return None;
        }
        cur.skip_whitespace();
        let value = if cur.eat("=") {
            cur.skip_whitespace();
            match cur.peek()? {
                quote @ ('"' | '\'') => {
                    cur.bump();
                    let value = cur.take_while(|c| c != quote).to_string();
                    if !cur.eat(&quote.to_string()) {
                        return None;
                    }
                    PropValue::Str(value)
                }
                '{' => PropValue::Expr(cur.braced()?.trim().to_string()),
                _ => return None,
            }
        } else {
            PropValue::Flag
        };
        props.insert(key, value);
    }
}

/// Position inside a tag being read
struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, f: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let end = rest.find(|c: char| !f(c)).unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    /// Read a `{...}` expression with nested braces and string literals,
    /// returning the text between the outer braces
    fn braced(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if !self.eat("{") {
            return None;
        }
        let mut depth = 1;
        while depth > 0 {
            match self.bump()? {
                '{' => depth += 1,
                '}' => depth -= 1,
                quote @ ('"' | '\'' | '`') => loop {
                    match self.bump()? {
                        '\\' => {
                            self.bump()?;
                        }
                        c if c == quote => break,
                        _ => {}
                    }
                },
                _ => {}
            }
        }
        Some(&self.src[start + 1..self.pos - 1])
    }
}

/// Markup collected for one open component (or the document root)
struct Frame {
    name: String,
    props: Props,
    children: Vec<Node>,
}

impl Frame {
    fn new(name: &str, props: Props) -> Self {
        Self {
            name: name.to_string(),
            props,
            children: Vec::new(),
        }
    }

    fn push_html(&mut self, html: &str) {
        if html.is_empty() {
            return;
        }
        match self.children.last_mut() {
            Some(Node::Html(last)) => last.push_str(html),
            _ => self.children.push(Node::Html(html.to_string())),
        }
    }

    fn into_node(self) -> Node {
        Node::Component(ComponentNode {
            name: self.name,
            props: self.props,
            children: self.children,
        })
    }
}

fn current<'s>(root: &'s mut Frame, open: &'s mut [Frame]) -> &'s mut Frame {
    match open.last_mut() {
        Some(frame) => frame,
        None => root,
    }
}

/// Split rendered HTML at the placeholders and nest everything in between
fn build_tree(rendered: &str, tags: &[TagToken]) -> Result<Vec<Node>, CompileError> {
    let rendered = MARKER_PARAGRAPH.replace_all(rendered, "$1");
    let mut root = Frame::new("", Props::new());
    let mut open: Vec<Frame> = Vec::new();
    let mut placed = vec![false; tags.len()];
    let mut last = 0;

    for caps in MARKER.captures_iter(&rendered) {
        let Some(whole) = caps.get(0) else { continue };
        current(&mut root, &mut open).push_html(&rendered[last..whole.start()]);
        last = whole.end();

        let Some((index, token)) = caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|i| tags.get(i).map(|t| (i, t)))
        else {
            continue;
        };
        if std::mem::replace(&mut placed[index], true) {
            return Err(CompileError::MalformedComponent {
                name: token.name().to_string(),
            });
        }

        match token {
            TagToken::Open {
                name,
                props,
                self_closing: true,
            } => current(&mut root, &mut open)
                .children
                .push(Node::Component(ComponentNode {
                    name: name.clone(),
                    props: props.clone(),
                    children: Vec::new(),
                })),
            TagToken::Open { name, props, .. } => open.push(Frame::new(name, props.clone())),
            TagToken::Close { name } => {
                let frame = match open.pop() {
                    Some(frame) if &frame.name == name => frame,
                    _ => return Err(CompileError::UnexpectedClose { name: name.clone() }),
                };
                let node = frame.into_node();
                current(&mut root, &mut open).children.push(node);
            }
        }
    }
    current(&mut root, &mut open).push_html(&rendered[last..]);

    if let Some(unclosed) = open.pop() {
        return Err(CompileError::UnclosedComponent {
            name: unclosed.name,
        });
    }
    // a placeholder that did not come back out of the renderer
    if let Some(lost) = placed.iter().position(|p| !p) {
        return Err(CompileError::MalformedComponent {
            name: tags[lost].name().to_string(),
        });
    }

    Ok(root.children)
}
