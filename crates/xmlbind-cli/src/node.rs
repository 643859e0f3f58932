//! Compute node declarations.

use std::fmt;
use std::path::PathBuf;

use xmlbind::Bind;

/// Open ports when none are declared.
pub const DEFAULT_OPEN_PORTS: &str = "22";

/// A request for one or more compute nodes.
#[derive(Bind, Debug, Clone, Default, PartialEq)]
#[xml(root = "node")]
pub struct NodeSpec {
    #[xml(attribute, required)]
    pub tag: String,
    #[xml(attribute)]
    pub count: Option<u32>,
    pub size: Option<String>,
    pub os: Option<String>,
    pub image: Option<String>,
    pub location: Option<String>,
    /// Comma-separated port numbers.
    pub openports: Option<String>,
    pub privatekeyfile: Option<PathBuf>,
    pub publickeyfile: Option<PathBuf>,
    pub runscript: Option<PathBuf>,
    pub hostproperty: Option<String>,
    pub idproperty: Option<String>,
    pub usernameproperty: Option<String>,
    pub passwordproperty: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid port `{0}` in open ports list")]
pub struct InvalidPort(String);

impl NodeSpec {
    /// Number of nodes, 1 when not declared.
    pub fn count(&self) -> u32 {
        self.count.unwrap_or(1)
    }

    /// Declared open ports, or the default.
    pub fn open_ports(&self) -> Result<Vec<u16>, InvalidPort> {
        self.openports
            .as_deref()
            .unwrap_or(DEFAULT_OPEN_PORTS)
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| p.parse().map_err(|_| InvalidPort(p.to_string())))
            .collect()
    }

    /// Properties the provisioned node's details are exported under.
    pub fn properties(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("host", &self.hostproperty),
            ("id", &self.idproperty),
            ("username", &self.usernameproperty),
            ("password", &self.passwordproperty),
        ]
        .into_iter()
        .filter_map(|(what, name)| name.as_deref().map(|name| (what, name)))
    }
}

/// Summary of a node declaration with defaults applied.
pub struct Summary<'a>(pub &'a NodeSpec);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0;
        writeln!(f, "tag:       {}", node.tag)?;
        writeln!(f, "count:     {}", node.count())?;

        let fields = [
            ("size", node.size.as_deref()),
            ("os", node.os.as_deref()),
            ("image", node.image.as_deref()),
            ("location", node.location.as_deref()),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                writeln!(f, "{:10} {value}", format!("{name}:"))?;
            }
        }

        match node.open_ports() {
            Ok(ports) => {
                let ports: Vec<String> = ports.iter().map(u16::to_string).collect();
                writeln!(f, "openports: {}", ports.join(", "))?;
            }
            Err(e) => writeln!(f, "openports: {e}")?,
        }

        let files = [
            ("private key", &node.privatekeyfile),
            ("public key", &node.publickeyfile),
            ("run script", &node.runscript),
        ];
        for (name, path) in files {
            if let Some(path) = path {
                writeln!(f, "{name}: {}", path.display())?;
            }
        }

        for (what, property) in node.properties() {
            writeln!(f, "{what} -> ${{{property}}}")?;
        }
        Ok(())
    }
}
