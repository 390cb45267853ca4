//! Static registry of security tools and how each one is installed.

use crate::tool_management::environment::PackageManager;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

const GITHUB: &str = "https://github.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ToolCategory {
    Network,
    Web,
    Tls,
    Recon,
    Password,
    Exploitation,
}

impl ToolCategory {
    pub const ALL: [ToolCategory; 6] = [
        ToolCategory::Network,
        ToolCategory::Web,
        ToolCategory::Tls,
        ToolCategory::Recon,
        ToolCategory::Password,
        ToolCategory::Exploitation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ToolCategory::Network => "Network",
            ToolCategory::Web => "Web",
            ToolCategory::Tls => "TLS/SSL",
            ToolCategory::Recon => "Recon",
            ToolCategory::Password => "Password",
            ToolCategory::Exploitation => "Exploitation",
        }
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A distribution package, with per-manager names where they differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSpec {
    pub name: String,
    pub overrides: Vec<(PackageManager, String)>,
}

impl PackageSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            overrides: Vec::new(),
        }
    }

    pub fn with_override(mut self, manager: PackageManager, name: impl Into<String>) -> Self {
        self.overrides.push((manager, name.into()));
        self
    }

    /// Package name to hand to `manager`.
    pub fn name_for(&self, manager: PackageManager) -> &str {
        self.overrides
            .iter()
            .find(|(pm, _)| *pm == manager)
            .map(|(_, name)| name.as_str())
            .unwrap_or(self.name.as_str())
    }
}

/// What to do inside a fresh or updated clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PostClone {
    /// `go build -o <output> .`, then link the output into the bin directory.
    GoBuild { output: String },
    /// `make`, then copy `binary` (relative to the clone) into the bin directory.
    Make { binary: String },
    /// Make `script` executable and symlink it into the bin directory.
    ScriptLink { script: String },
    /// Install `requirements.txt` and run `setup.py` when present.
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRepo {
    pub url: String,
    /// Directory name under the install directory.
    pub dir_name: String,
    pub post_clone: PostClone,
}

impl SourceRepo {
    pub fn github(owner: &str, repo: &str, post_clone: PostClone) -> Self {
        Self {
            url: format!("{}/{}/{}.git", GITHUB, owner, repo),
            dir_name: repo.to_string(),
            post_clone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Ecosystem {
    Python,
    Go,
    Ruby,
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ecosystem::Python => write!(f, "pip"),
            Ecosystem::Go => write!(f, "go"),
            Ecosystem::Ruby => write!(f, "gem"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguagePackage {
    pub ecosystem: Ecosystem,
    /// Package name, or module path for Go.
    pub package: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpecialCase {
    Metasploit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InstallDirective {
    Package(PackageSpec),
    Source(SourceRepo),
    Language(LanguagePackage),
    Special(SpecialCase),
}

impl InstallDirective {
    pub fn kind(&self) -> &'static str {
        match self {
            InstallDirective::Package(_) => "package",
            InstallDirective::Source(_) => "source",
            InstallDirective::Language(_) => "language",
            InstallDirective::Special(_) => "special",
        }
    }
}

impl fmt::Display for InstallDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallDirective::Package(spec) => write!(f, "package {}", spec.name),
            InstallDirective::Source(repo) => write!(f, "git {}", repo.url),
            InstallDirective::Language(pkg) => write!(f, "{} {}", pkg.ecosystem, pkg.package),
            InstallDirective::Special(case) => write!(f, "special {:?}", case),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolEntry {
    /// Executable name looked up on the search path.
    pub name: String,
    pub category: ToolCategory,
    pub description: String,
    pub directive: InstallDirective,
}

impl ToolEntry {
    pub fn new(
        name: &str,
        category: ToolCategory,
        description: &str,
        directive: InstallDirective,
    ) -> Self {
        Self {
            name: name.to_string(),
            category,
            description: description.to_string(),
            directive,
        }
    }

    pub fn package(name: &str, category: ToolCategory, description: &str) -> Self {
        Self::new(
            name,
            category,
            description,
            InstallDirective::Package(PackageSpec::new(name)),
        )
    }
}

/// Registry of known tools, keyed by executable name.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolEntry>,
}

impl ToolRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with every built-in tool.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register_builtin_tools();
        registry
    }

    pub fn register(&mut self, tool: ToolEntry) {
        self.tools.insert(tool.name.clone(), tool);
    }

    pub fn get(&self, name: &str) -> Option<&ToolEntry> {
        self.tools.get(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolEntry> {
        self.tools.values()
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn in_category(&self, category: ToolCategory) -> impl Iterator<Item = &ToolEntry> {
        self.tools.values().filter(move |t| t.category == category)
    }

    /// Drop tools the user disabled in the config.
    pub fn without(mut self, disabled: &[String]) -> Self {
        for name in disabled {
            self.tools.remove(name);
        }
        self
    }

    #[allow(clippy::too_many_lines)]
    fn register_builtin_tools(&mut self) {
        use InstallDirective::{Language, Package, Source, Special};
        use ToolCategory::*;

        // Network
        self.register(ToolEntry::package("nmap", Network, "Network mapper and port scanner"));
        self.register(ToolEntry::package("masscan", Network, "Asynchronous TCP port scanner"));
        self.register(ToolEntry::package("tcpdump", Network, "Packet capture"));
        self.register(ToolEntry::package("hping3", Network, "Packet crafting"));
        self.register(ToolEntry::package("whois", Network, "Domain registration lookup"));
        self.register(ToolEntry::new(
            "nc",
            Network,
            "Netcat",
            Package(
                PackageSpec::new("netcat-openbsd")
                    .with_override(PackageManager::Dnf, "nmap-ncat")
                    .with_override(PackageManager::Pacman, "openbsd-netcat")
                    .with_override(PackageManager::Zypper, "netcat-openbsd")
                    .with_override(PackageManager::Brew, "netcat"),
            ),
        ));
        self.register(ToolEntry::new(
            "dig",
            Network,
            "DNS lookup utility",
            Package(
                PackageSpec::new("dnsutils")
                    .with_override(PackageManager::Dnf, "bind-utils")
                    .with_override(PackageManager::Pacman, "bind")
                    .with_override(PackageManager::Zypper, "bind-utils")
                    .with_override(PackageManager::Apk, "bind-tools")
                    .with_override(PackageManager::Brew, "bind"),
            ),
        ));

        // Web
        self.register(ToolEntry::package("nikto", Web, "Web server scanner"));
        self.register(ToolEntry::package("dirb", Web, "Web content scanner"));
        self.register(ToolEntry::package("whatweb", Web, "Web technology fingerprinting"));
        self.register(ToolEntry::new(
            "sqlmap",
            Web,
            "SQL injection automation",
            Source(SourceRepo::github(
                "sqlmapproject",
                "sqlmap",
                PostClone::ScriptLink {
                    script: "sqlmap.py".to_string(),
                },
            )),
        ));
        self.register(ToolEntry::new(
            "gobuster",
            Web,
            "Directory and DNS brute forcing",
            Language(LanguagePackage {
                ecosystem: Ecosystem::Go,
                package: "github.com/OJ/gobuster/v3".to_string(),
            }),
        ));
        self.register(ToolEntry::new(
            "ffuf",
            Web,
            "Fast web fuzzer",
            Language(LanguagePackage {
                ecosystem: Ecosystem::Go,
                package: "github.com/ffuf/ffuf/v2".to_string(),
            }),
        ));
        self.register(ToolEntry::new(
            "wpscan",
            Web,
            "WordPress vulnerability scanner",
            Language(LanguagePackage {
                ecosystem: Ecosystem::Ruby,
                package: "wpscan".to_string(),
            }),
        ));

        // TLS
        self.register(ToolEntry::package("sslscan", Tls, "TLS cipher scanner"));
        self.register(ToolEntry::new(
            "testssl.sh",
            Tls,
            "TLS/SSL configuration tester",
            Source(SourceRepo::github(
                "drwetter",
                "testssl.sh",
                PostClone::ScriptLink {
                    script: "testssl.sh".to_string(),
                },
            )),
        ));
        self.register(ToolEntry::new(
            "sslyze",
            Tls,
            "TLS configuration analyzer",
            Language(LanguagePackage {
                ecosystem: Ecosystem::Python,
                package: "sslyze".to_string(),
            }),
        ));

        // Recon
        self.register(ToolEntry::new(
            "subfinder",
            Recon,
            "Passive subdomain discovery",
            Language(LanguagePackage {
                ecosystem: Ecosystem::Go,
                package: "github.com/projectdiscovery/subfinder/v2/cmd/subfinder".to_string(),
            }),
        ));
        self.register(ToolEntry::new(
            "httpx",
            Recon,
            "HTTP probing toolkit",
            Language(LanguagePackage {
                ecosystem: Ecosystem::Go,
                package: "github.com/projectdiscovery/httpx/cmd/httpx".to_string(),
            }),
        ));
        self.register(ToolEntry::new(
            "nuclei",
            Recon,
            "Template based vulnerability scanner",
            Language(LanguagePackage {
                ecosystem: Ecosystem::Go,
                package: "github.com/projectdiscovery/nuclei/v3/cmd/nuclei".to_string(),
            }),
        ));
        self.register(ToolEntry::new(
            "amass",
            Recon,
            "Attack surface mapping",
            Language(LanguagePackage {
                ecosystem: Ecosystem::Go,
                package: "github.com/owasp-amass/amass/v4/...".to_string(),
            }),
        ));
        self.register(ToolEntry::new(
            "theHarvester",
            Recon,
            "E-mail, subdomain and name harvester",
            Source(SourceRepo::github("laramies", "theHarvester", PostClone::Generic)),
        ));
        self.register(ToolEntry::new(
            "dnsrecon",
            Recon,
            "DNS enumeration",
            Language(LanguagePackage {
                ecosystem: Ecosystem::Python,
                package: "dnsrecon".to_string(),
            }),
        ));
        self.register(ToolEntry::new(
            "kerbrute",
            Recon,
            "Kerberos user enumeration",
            Source(SourceRepo::github(
                "ropnop",
                "kerbrute",
                PostClone::GoBuild {
                    output: "kerbrute".to_string(),
                },
            )),
        ));
        self.register(ToolEntry::new(
            "massdns",
            Recon,
            "High-performance DNS stub resolver",
            Source(SourceRepo::github(
                "blechschmidt",
                "massdns",
                PostClone::Make {
                    binary: "bin/massdns".to_string(),
                },
            )),
        ));

        // Password
        self.register(ToolEntry::package("hydra", Password, "Online login brute forcer"));
        self.register(ToolEntry::package("john", Password, "John the Ripper password cracker"));
        self.register(ToolEntry::package("hashcat", Password, "GPU password recovery"));

        // Exploitation
        self.register(ToolEntry::new(
            "msfconsole",
            Exploitation,
            "Metasploit Framework",
            Special(SpecialCase::Metasploit),
        ));
        self.register(ToolEntry::new(
            "searchsploit",
            Exploitation,
            "Exploit-DB offline search",
            Source(SourceRepo {
                url: "https://gitlab.com/exploit-database/exploitdb.git".to_string(),
                dir_name: "exploitdb".to_string(),
                post_clone: PostClone::ScriptLink {
                    script: "searchsploit".to_string(),
                },
            }),
        ));
    }
}
