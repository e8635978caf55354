use crate::processors::github::{PackageManifest, RepositorySnapshot};
use crate::project::{Badge, MAX_TECH_STACK};
use lazy_static::lazy_static;
use std::collections::{BTreeMap, HashMap};

/// Languages considered, by byte count
const TOP_LANGUAGES: usize = 3;

struct BadgeSpec {
    /// Lowercase language names, topic slugs and package names
    keys: &'static [&'static str],
    abbreviation: &'static str,
    name: &'static str,
    description: &'static str,
    gradient: &'static str,
}

const BADGES: &[BadgeSpec] = &[
    BadgeSpec { keys: &["javascript", "js"], abbreviation: "JS", name: "JavaScript", description: "Dynamic scripting for the web", gradient: "linear-gradient(135deg, #f7df1e, #e8a317)" },
    BadgeSpec { keys: &["typescript", "ts"], abbreviation: "TS", name: "TypeScript", description: "Typed superset of JavaScript", gradient: "linear-gradient(135deg, #3178c6, #235a97)" },
    BadgeSpec { keys: &["python", "python3"], abbreviation: "PY", name: "Python", description: "Readable general-purpose language", gradient: "linear-gradient(135deg, #3776ab, #ffd43b)" },
    BadgeSpec { keys: &["rust"], abbreviation: "RS", name: "Rust", description: "Memory-safe systems programming", gradient: "linear-gradient(135deg, #dea584, #b7410e)" },
    BadgeSpec { keys: &["go", "golang"], abbreviation: "GO", name: "Go", description: "Simple, fast compiled language", gradient: "linear-gradient(135deg, #00add8, #007d9c)" },
    BadgeSpec { keys: &["java"], abbreviation: "JV", name: "Java", description: "Portable object-oriented language", gradient: "linear-gradient(135deg, #f89820, #5382a1)" },
    BadgeSpec { keys: &["c++", "cpp"], abbreviation: "C++", name: "C++", description: "High-performance native code", gradient: "linear-gradient(135deg, #00599c, #004482)" },
    BadgeSpec { keys: &["c#", "csharp"], abbreviation: "C#", name: "C#", description: "Modern language for .NET", gradient: "linear-gradient(135deg, #9b4f96, #68217a)" },
    BadgeSpec { keys: &["html", "html5"], abbreviation: "HTML", name: "HTML5", description: "Semantic page structure", gradient: "linear-gradient(135deg, #e34f26, #f06529)" },
    BadgeSpec { keys: &["css", "css3", "scss"], abbreviation: "CSS", name: "CSS3", description: "Styling and layout", gradient: "linear-gradient(135deg, #1572b6, #33a9dc)" },
    BadgeSpec { keys: &["shell", "bash"], abbreviation: "SH", name: "Shell", description: "Command-line automation", gradient: "linear-gradient(135deg, #4eaa25, #293138)" },
    BadgeSpec { keys: &["swift"], abbreviation: "SW", name: "Swift", description: "Native Apple platform apps", gradient: "linear-gradient(135deg, #f05138, #fa7343)" },
    BadgeSpec { keys: &["kotlin"], abbreviation: "KT", name: "Kotlin", description: "Concise JVM and Android language", gradient: "linear-gradient(135deg, #7f52ff, #c711e1)" },
    BadgeSpec { keys: &["react", "reactjs", "react-dom"], abbreviation: "RE", name: "React", description: "Component-based UI library", gradient: "linear-gradient(135deg, #61dafb, #21a1c4)" },
    BadgeSpec { keys: &["nextjs", "next", "next-js"], abbreviation: "NX", name: "Next.js", description: "React framework with server rendering", gradient: "linear-gradient(135deg, #000000, #434343)" },
    BadgeSpec { keys: &["vue", "vuejs"], abbreviation: "VU", name: "Vue.js", description: "Progressive UI framework", gradient: "linear-gradient(135deg, #42b883, #35495e)" },
    BadgeSpec { keys: &["svelte"], abbreviation: "SV", name: "Svelte", description: "Compiled reactive components", gradient: "linear-gradient(135deg, #ff3e00, #ff7a45)" },
    BadgeSpec { keys: &["node", "nodejs", "node-js"], abbreviation: "ND", name: "Node.js", description: "JavaScript on the server", gradient: "linear-gradient(135deg, #339933, #215732)" },
    BadgeSpec { keys: &["express", "expressjs"], abbreviation: "EX", name: "Express", description: "Minimal Node.js web framework", gradient: "linear-gradient(135deg, #444444, #000000)" },
    BadgeSpec { keys: &["tailwindcss", "tailwind"], abbreviation: "TW", name: "Tailwind CSS", description: "Utility-first styling", gradient: "linear-gradient(135deg, #38bdf8, #0e7490)" },
    BadgeSpec { keys: &["vite"], abbreviation: "VI", name: "Vite", description: "Fast frontend build tooling", gradient: "linear-gradient(135deg, #646cff, #bd34fe)" },
    BadgeSpec { keys: &["mongodb", "mongoose"], abbreviation: "MG", name: "MongoDB", description: "Document database", gradient: "linear-gradient(135deg, #47a248, #3f3e42)" },
    BadgeSpec { keys: &["postgresql", "postgres", "pg", "psycopg2", "psycopg2-binary"], abbreviation: "PG", name: "PostgreSQL", description: "Relational database", gradient: "linear-gradient(135deg, #336791, #1d3f5e)" },
    BadgeSpec { keys: &["prisma", "@prisma/client"], abbreviation: "PR", name: "Prisma", description: "Type-safe database ORM", gradient: "linear-gradient(135deg, #2d3748, #5a67d8)" },
    BadgeSpec { keys: &["redis", "ioredis"], abbreviation: "RD", name: "Redis", description: "In-memory data store", gradient: "linear-gradient(135deg, #dc382d, #a41e11)" },
    BadgeSpec { keys: &["firebase", "firebase-admin"], abbreviation: "FB", name: "Firebase", description: "Hosted backend services", gradient: "linear-gradient(135deg, #ffca28, #f57c00)" },
    BadgeSpec { keys: &["graphql", "@apollo/client", "apollo-server"], abbreviation: "GQ", name: "GraphQL", description: "Typed query language for APIs", gradient: "linear-gradient(135deg, #e10098, #9b0068)" },
    BadgeSpec { keys: &["docker", "dockerfile"], abbreviation: "DK", name: "Docker", description: "Containerized deployment", gradient: "linear-gradient(135deg, #2496ed, #1d63a6)" },
    BadgeSpec { keys: &["flask"], abbreviation: "FL", name: "Flask", description: "Lightweight Python web framework", gradient: "linear-gradient(135deg, #000000, #3b3b3b)" },
    BadgeSpec { keys: &["django", "djangorestframework"], abbreviation: "DJ", name: "Django", description: "Batteries-included Python web framework", gradient: "linear-gradient(135deg, #092e20, #44b78b)" },
    BadgeSpec { keys: &["fastapi"], abbreviation: "FA", name: "FastAPI", description: "Async Python APIs with type hints", gradient: "linear-gradient(135deg, #009688, #05998b)" },
    BadgeSpec { keys: &["streamlit"], abbreviation: "ST", name: "Streamlit", description: "Data apps in pure Python", gradient: "linear-gradient(135deg, #ff4b4b, #ff8c8c)" },
    BadgeSpec { keys: &["pandas"], abbreviation: "PD", name: "Pandas", description: "Tabular data analysis", gradient: "linear-gradient(135deg, #150458, #e70488)" },
    BadgeSpec { keys: &["numpy"], abbreviation: "NP", name: "NumPy", description: "Numerical computing", gradient: "linear-gradient(135deg, #4dabcf, #013243)" },
    BadgeSpec { keys: &["pytorch", "torch"], abbreviation: "PT", name: "PyTorch", description: "Deep learning framework", gradient: "linear-gradient(135deg, #ee4c2c, #c0392b)" },
    BadgeSpec { keys: &["tensorflow"], abbreviation: "TF", name: "TensorFlow", description: "Machine learning platform", gradient: "linear-gradient(135deg, #ff6f00, #ffa800)" },
    BadgeSpec { keys: &["scikit-learn", "sklearn"], abbreviation: "SK", name: "scikit-learn", description: "Classical machine learning", gradient: "linear-gradient(135deg, #f7931e, #29abe2)" },
    BadgeSpec { keys: &["openai", "openai-api"], abbreviation: "AI", name: "OpenAI", description: "Large language model APIs", gradient: "linear-gradient(135deg, #10a37f, #0d8a6c)" },
    BadgeSpec { keys: &["langchain", "@langchain/core"], abbreviation: "LC", name: "LangChain", description: "LLM application framework", gradient: "linear-gradient(135deg, #1c3c3c, #3d7a7a)" },
    BadgeSpec { keys: &["aws", "aws-sdk", "boto3"], abbreviation: "AWS", name: "AWS", description: "Cloud infrastructure", gradient: "linear-gradient(135deg, #ff9900, #232f3e)" },
    BadgeSpec { keys: &["socket.io", "socketio", "websocket", "ws"], abbreviation: "WS", name: "WebSockets", description: "Real-time messaging", gradient: "linear-gradient(135deg, #010101, #4a4a4a)" },
    BadgeSpec { keys: &["chart.js", "chartjs", "recharts", "d3"], abbreviation: "CH", name: "Charts", description: "Data visualization", gradient: "linear-gradient(135deg, #ff6384, #36a2eb)" },
];

lazy_static! {
    /// Lookup from every key to its badge
    static ref BADGE_INDEX: HashMap<&'static str, &'static BadgeSpec> = BADGES
        .iter()
        .flat_map(|spec| spec.keys.iter().map(move |key| (*key, spec)))
        .collect();
}

/// Looks up the badge for a language name, topic slug or package name
pub fn lookup_badge(key: &str) -> Option<Badge> {
    let key = key.trim().to_lowercase();
    BADGE_INDEX
        .get(key.as_str())
        .map(|spec| Badge::new(spec.abbreviation, spec.name, spec.description, spec.gradient))
}

/// Badges shown when nothing was detected
pub fn placeholder_badges() -> Vec<Badge> {
    vec![
        Badge::new("</>", "Code", "Built from scratch", "linear-gradient(135deg, #667eea, #764ba2)"),
        Badge::new("GH", "GitHub", "Open source on GitHub", "linear-gradient(135deg, #24292e, #586069)"),
    ]
}

/// Ordered, deduplicated, capped list of badges
#[derive(Debug, Default)]
struct TechStack {
    badges: Vec<Badge>,
}

impl TechStack {
    fn is_full(&self) -> bool {
        self.badges.len() >= MAX_TECH_STACK
    }

    /// Adds the badge for `key` unless it is unknown, already present, or the stack is full
    fn offer(&mut self, key: &str) {
        if self.is_full() {
            return;
        }
        if let Some(badge) = lookup_badge(key) {
            let duplicate = self
                .badges
                .iter()
                .any(|b| b.name.eq_ignore_ascii_case(&badge.name));
            if !duplicate {
                self.badges.push(badge);
            }
        }
    }
}

/// Detects the tech stack of a fetched repository
pub fn detect(snapshot: &RepositorySnapshot) -> Vec<Badge> {
    detect_from(
        &snapshot.languages,
        &snapshot.metadata.topics,
        snapshot.package_manifest.as_ref(),
        snapshot.requirements.as_deref(),
    )
}

/// Scans languages, then topics, then JS dependencies, then Python requirements
pub fn detect_from(
    languages: &BTreeMap<String, u64>,
    topics: &[String],
    manifest: Option<&PackageManifest>,
    requirements: Option<&str>,
) -> Vec<Badge> {
    let mut stack = TechStack::default();

    for language in top_languages(languages, TOP_LANGUAGES) {
        stack.offer(language);
    }
    for topic in topics {
        stack.offer(topic);
    }
    if let Some(manifest) = manifest {
        for dependency in manifest.dependency_names() {
            stack.offer(dependency);
        }
    }
    if let Some(requirements) = requirements {
        for package in requirement_names(requirements) {
            stack.offer(&package);
        }
    }

    stack.badges
}

/// The `n` languages with the most bytes, ties broken by name
fn top_languages(languages: &BTreeMap<String, u64>, n: usize) -> Vec<&str> {
    let mut ranked: Vec<(&String, &u64)> = languages.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    ranked.into_iter().take(n).map(|(name, _)| name.as_str()).collect()
}

/// Package names from a `requirements.txt`, comments and version specifiers removed
fn requirement_names(requirements: &str) -> Vec<String> {
    requirements
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty() && !line.starts_with('-'))
        .filter_map(|line| {
            let name: String = line
                .chars()
                .take_while(|&c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
                .collect();
            (!name.is_empty()).then(|| name.to_lowercase().replace('_', "-"))
        })
        .collect()
}
