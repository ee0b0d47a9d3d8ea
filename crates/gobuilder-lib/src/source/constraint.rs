//! Build constraints: file-name suffixes, `//go:build` and `// +build` lines.

use indexmap::IndexSet;

/// Operating systems the Go toolchain knows about.
pub const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

/// Architectures the Go toolchain knows about.
pub const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

/// Operating systems that satisfy the `unix` tag.
pub const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

/// Newest Go release whose `go1.N` tag is satisfied by default.
pub const DEFAULT_GO_RELEASE: u32 = 22;

/// The compiler tag. Files constrained to `gc` never match.
pub const COMPILER: &str = "gccgo";

/// The platform and tags source files are matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    pub goos: String,
    pub goarch: String,
    pub compiler: String,
    pub tags: IndexSet<String>,
    /// Minor version of the newest satisfied release tag (`go1.<release>`).
    pub release: u32,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::host()
    }
}

impl BuildContext {
    pub fn new(goos: impl Into<String>, goarch: impl Into<String>) -> Self {
        Self {
            goos: goos.into(),
            goarch: goarch.into(),
            compiler: COMPILER.to_owned(),
            tags: IndexSet::new(),
            release: DEFAULT_GO_RELEASE,
        }
    }

    /// Context for the machine running the driver.
    pub fn host() -> Self {
        Self::new(host_goos(), host_goarch())
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_release(mut self, release: u32) -> Self {
        self.release = release;
        self
    }

    /// Reports whether a single build tag is satisfied.
    pub fn match_tag(&self, tag: &str) -> bool {
        if tag == self.goos || tag == self.goarch || tag == self.compiler {
            return true;
        }
        match tag {
            "unix" => UNIX_OS.contains(&self.goos.as_str()),
            "linux" => self.goos == "android",
            "solaris" => self.goos == "illumos",
            "darwin" => self.goos == "ios",
            // cgo is never enabled.
            "cgo" => false,
            _ => {
                if let Some(minor) = tag.strip_prefix("go1.")
                    && let Ok(minor) = minor.parse::<u32>()
                {
                    return minor >= 1 && minor <= self.release;
                }
                self.tags.contains(tag)
            }
        }
    }

    /// Applies the `_GOOS`, `_GOARCH` and `_GOOS_GOARCH` file-name conventions.
    pub fn match_file_name(&self, name: &str) -> bool {
        if name.starts_with('_') || name.starts_with('.') {
            return false;
        }

        let stem = name.split_once('.').map_or(name, |(stem, _)| stem);
        // Everything before the first '_' is the file's own name, never a constraint.
        let Some(first) = stem.find('_') else {
            return true;
        };
        let mut parts: Vec<&str> = stem[first + 1..].split('_').collect();
        if parts.last() == Some(&"test") {
            parts.pop();
        }

        let n = parts.len();
        if n >= 2 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
            return self.match_tag(parts[n - 2]) && self.match_tag(parts[n - 1]);
        }
        if n >= 1 && (KNOWN_OS.contains(&parts[n - 1]) || KNOWN_ARCH.contains(&parts[n - 1])) {
            return self.match_tag(parts[n - 1]);
        }
        true
    }

    /// Evaluates the constraint comments at the top of a source file.
    ///
    /// A `//go:build` line anywhere in the leading comment block takes
    /// precedence over `// +build` lines. `+build` lines only count when a
    /// blank line follows them before the package clause.
    pub fn match_header(&self, source: &str) -> Result<bool, String> {
        let header = leading_comments(source);

        let mut go_build = None;
        for line in &header.lines {
            if let Some(expr) = line.strip_prefix("//go:build")
                && (expr.is_empty() || expr.starts_with([' ', '\t']))
            {
                if go_build.is_some() {
                    return Err("multiple //go:build comments".to_owned());
                }
                go_build = Some(Expr::parse(expr)?);
            }
        }
        if let Some(expr) = go_build {
            return Ok(expr.eval(&|tag| self.match_tag(tag)));
        }

        for line in &header.lines[..header.plus_build_end] {
            let Some(body) = line.strip_prefix("//") else {
                continue;
            };
            let body = body.trim_start();
            if let Some(options) = body.strip_prefix("+build")
                && (options.is_empty() || options.starts_with([' ', '\t']))
                && !self.match_plus_build(options)
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// `// +build a,b !c`: space-separated options are ORed, comma-separated
    /// terms within an option are ANDed.
    fn match_plus_build(&self, options: &str) -> bool {
        let mut options = options.split_whitespace().peekable();
        if options.peek().is_none() {
            return true;
        }
        options.any(|option| {
            option.split(',').all(|term| match term.strip_prefix('!') {
                Some(negated) => {
                    !negated.starts_with('!') && is_valid_tag(negated) && !self.match_tag(negated)
                }
                None => is_valid_tag(term) && self.match_tag(term),
            })
        })
    }
}

/// The `//` comment lines above the package clause.
struct LeadingComments<'s> {
    lines: Vec<&'s str>,
    /// `lines[..plus_build_end]` are followed by a blank line.
    plus_build_end: usize,
}

/// Collects the trimmed `//` comment lines that may carry constraints.
///
/// Scanning stops at the first line that is neither blank nor a comment.
/// Blank lines stop extending `plus_build_end` once a block comment has been
/// seen.
fn leading_comments(source: &str) -> LeadingComments<'_> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut lines = Vec::new();
    let mut plus_build_end = 0;
    let mut in_block = false;
    let mut ended = false;

    for line in source.lines() {
        let mut line = line.trim();
        if in_block {
            match line.find("*/") {
                Some(end) => {
                    in_block = false;
                    line = line[end + 2..].trim();
                    if line.is_empty() {
                        continue;
                    }
                }
                None => continue,
            }
        }

        if line.is_empty() {
            if !ended {
                plus_build_end = lines.len();
            }
        } else if line.starts_with("//") {
            lines.push(line);
        } else if let Some(rest) = line.strip_prefix("/*") {
            ended = true;
            match rest.find("*/") {
                Some(end) if rest[end + 2..].trim().is_empty() => {}
                Some(_) => break,
                None => in_block = true,
            }
        } else {
            break;
        }
    }

    LeadingComments {
        lines,
        plus_build_end,
    }
}

fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// A `//go:build` boolean expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Tag(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Parses the text following `//go:build`.
    pub fn parse(text: &str) -> Result<Expr, String> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err("empty //go:build expression".to_owned());
        }
        let mut parser = ExprParser { tokens, pos: 0 };
        let expr = parser.or()?;
        if let Some(token) = parser.tokens.get(parser.pos) {
            return Err(format!("unexpected {token} in //go:build expression"));
        }
        Ok(expr)
    }

    pub fn eval(&self, is_set: &dyn Fn(&str) -> bool) -> bool {
        match self {
            Expr::Tag(tag) => is_set(tag),
            Expr::Not(inner) => !inner.eval(is_set),
            Expr::And(lhs, rhs) => lhs.eval(is_set) && rhs.eval(is_set),
            Expr::Or(lhs, rhs) => lhs.eval(is_set) || rhs.eval(is_set),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ExprToken {
    Tag(String),
    Not,
    And,
    Or,
    Open,
    Close,
}

impl std::fmt::Display for ExprToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprToken::Tag(tag) => write!(f, "tag {tag:?}"),
            ExprToken::Not => write!(f, "'!'"),
            ExprToken::And => write!(f, "'&&'"),
            ExprToken::Or => write!(f, "'||'"),
            ExprToken::Open => write!(f, "'('"),
            ExprToken::Close => write!(f, "')'"),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<ExprToken>, String> {
    let mut tokens = Vec::new();
    let mut rest = text.trim();
    while !rest.is_empty() {
        let (token, len) = if rest.starts_with("&&") {
            (ExprToken::And, 2)
        } else if rest.starts_with("||") {
            (ExprToken::Or, 2)
        } else if rest.starts_with('!') {
            (ExprToken::Not, 1)
        } else if rest.starts_with('(') {
            (ExprToken::Open, 1)
        } else if rest.starts_with(')') {
            (ExprToken::Close, 1)
        } else {
            let len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'))
                .unwrap_or(rest.len());
            if len == 0 {
                let bad = rest.chars().next().unwrap_or_default();
                return Err(format!("invalid character {bad:?} in //go:build expression"));
            }
            (ExprToken::Tag(rest[..len].to_owned()), len)
        };
        tokens.push(token);
        rest = rest[len..].trim_start();
    }
    Ok(tokens)
}

struct ExprParser {
    tokens: Vec<ExprToken>,
    pos: usize,
}

impl ExprParser {
    fn or(&mut self) -> Result<Expr, String> {
        let mut lhs = self.and()?;
        while self.eat(&ExprToken::Or) {
            lhs = Expr::Or(Box::new(lhs), Box::new(self.and()?));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, String> {
        let mut lhs = self.not()?;
        while self.eat(&ExprToken::And) {
            lhs = Expr::And(Box::new(lhs), Box::new(self.not()?));
        }
        Ok(lhs)
    }

    fn not(&mut self) -> Result<Expr, String> {
        if self.eat(&ExprToken::Not) {
            return Ok(Expr::Not(Box::new(self.not()?)));
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Expr, String> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        match token {
            Some(ExprToken::Tag(tag)) => Ok(Expr::Tag(tag)),
            Some(ExprToken::Open) => {
                let inner = self.or()?;
                if !self.eat(&ExprToken::Close) {
                    return Err("missing ')' in //go:build expression".to_owned());
                }
                Ok(inner)
            }
            Some(other) => Err(format!("unexpected {other} in //go:build expression")),
            None => Err("unexpected end of //go:build expression".to_owned()),
        }
    }

    fn eat(&mut self, token: &ExprToken) -> bool {
        if self.tokens.get(self.pos) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }
}

fn host_goos() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

fn host_goarch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc" => "ppc",
        "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}
