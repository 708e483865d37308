use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub enum AuditTarget {
    Url(Url),
    File(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Audit(AuditTarget),
    Scroll(i64),
    Depth,
    Help,
    Quit,
    Chat(String),
    Empty,
    Invalid(String),
}

impl AuditTarget {
    /// http(s) 地址走浏览器，其余按本地文件处理
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => AuditTarget::Url(url),
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => AuditTarget::File(path.display().to_string()),
                Err(_) => AuditTarget::File(raw.to_string()),
            },
            _ => AuditTarget::File(raw.to_string()),
        }
    }
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            return Command::Quit;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Chat(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "audit" if !arg.is_empty() => Command::Audit(AuditTarget::parse(arg)),
            "audit" => Command::Invalid("usage: /audit <url|file>".into()),
            "scroll" => match arg.parse::<i64>() {
                Ok(pixels) => Command::Scroll(pixels),
                Err(_) => Command::Invalid("usage: /scroll <pixels>".into()),
            },
            "depth" => Command::Depth,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Invalid(format!("unknown command: /{}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_chat() {
        assert_eq!(Command::parse("  How much is SEO?  "), Command::Chat("How much is SEO?".into()));
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("EXIT"), Command::Quit);
    }

    #[test]
    fn audit_targets() {
        match Command::parse("/audit https://reelin.example/services") {
            Command::Audit(AuditTarget::Url(url)) => assert_eq!(url.path(), "/services"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            Command::parse("/audit ./site/index.html"),
            Command::Audit(AuditTarget::File("./site/index.html".into()))
        );
        assert_eq!(
            Command::parse("/audit file:///tmp/index.html"),
            Command::Audit(AuditTarget::File("/tmp/index.html".into()))
        );
        assert!(matches!(Command::parse("/audit"), Command::Invalid(_)));
    }

    #[test]
    fn scroll_needs_a_number() {
        assert_eq!(Command::parse("/scroll 400"), Command::Scroll(400));
        assert_eq!(Command::parse("/scroll -200"), Command::Scroll(-200));
        assert!(matches!(Command::parse("/scroll down"), Command::Invalid(_)));
        assert!(matches!(Command::parse("/jump"), Command::Invalid(_)));
    }
}
