//! Curated skills vocabulary, read-only after construction.

use std::collections::HashSet;

/// Known technologies and skills, grouped loosely by area. Order is the order
/// in which vocabulary scans report matches.
const CURATED_SKILLS: &[&str] = &[
    // Programming languages
    "Python", "JavaScript", "TypeScript", "Java", "C++", "C#", "Go", "Rust", "Swift", "Kotlin",
    "Scala", "Ruby", "PHP", "Perl", "R", "MATLAB", "SQL", "Dart", "Clojure", "Haskell",
    "Erlang", "Elixir", "Objective-C", "Lua", "Julia", "F#", "Bash", "PowerShell", "Solidity",
    // Web
    "HTML", "CSS", "React", "Angular", "Vue", "Svelte", "Next.js", "Node.js", "Express",
    "Django", "Flask", "FastAPI", "Spring", "Spring Boot", "Laravel", "Symfony", "Ruby on Rails",
    "ASP.NET", ".NET", "jQuery", "Bootstrap", "Tailwind", "SASS", "LESS", "Webpack", "Redux",
    "GraphQL", "REST API", "gRPC", "WebSockets",
    // Cloud and DevOps
    "AWS", "Azure", "GCP", "Google Cloud", "Docker", "Kubernetes", "Terraform", "Ansible",
    "Jenkins", "GitLab CI", "GitHub Actions", "CircleCI", "Prometheus", "Grafana", "ELK Stack",
    "Splunk", "Datadog", "Helm", "Nginx", "Linux", "Git", "CI/CD", "Serverless", "Microservices",
    "AWS Lambda", "EC2", "S3", "CloudFormation", "OpenShift",
    // Databases
    "PostgreSQL", "MySQL", "SQLite", "MongoDB", "Redis", "Elasticsearch", "Cassandra",
    "DynamoDB", "Neo4j", "InfluxDB", "CouchDB", "Oracle", "SQL Server", "Snowflake",
    "BigQuery", "Redshift", "Firebase",
    // Data and ML
    "TensorFlow", "PyTorch", "Keras", "Scikit-learn", "Pandas", "NumPy", "SciPy", "Matplotlib",
    "Seaborn", "Plotly", "Jupyter", "Apache Spark", "Hadoop", "Hive", "Pig", "Kafka", "Airflow",
    "dbt", "Tableau", "Power BI", "Excel", "Machine Learning", "Deep Learning",
    "Natural Language Processing", "Computer Vision", "Data Analysis", "Statistics", "LLM",
    "Hugging Face", "OpenCV", "XGBoost", "MLflow",
    // Mobile
    "React Native", "Flutter", "Xamarin", "Cordova", "Ionic", "Android", "iOS",
    "Android Studio", "Xcode", "SwiftUI", "Jetpack Compose",
    // Practices and other
    "Agile", "Scrum", "Kanban", "Jira", "Confluence", "Figma", "TDD", "Unit Testing",
    "Selenium", "Cypress", "Jest", "Pytest", "JUnit", "OAuth", "Blockchain", "IoT", "AR/VR",
    "Unity", "Unreal Engine", "Embedded Systems", "RabbitMQ", "Celery", "Project Management",
];

/// Terms that are also ordinary English words (or single letters); these only
/// match with their exact capitalisation.
const CASE_SENSITIVE_SKILLS: &[&str] = &[
    "R", "Go", "Rust", "Swift", "Dart", "Express", "Spring", "LESS", "Hive", "Pig", "Ionic",
    "Excel", "Oracle", "Unity", "Agile", "Statistics", "Android", "Helm", "Celery",
];

/// One vocabulary entry with its pre-computed match forms.
#[derive(Debug, Clone)]
pub struct SkillTerm {
    pub name: String,
    pub case_sensitive: bool,
    /// Lower-cased unless `case_sensitive`.
    needle: String,
    /// Phrase-matcher tokens, folded the same way as `needle`.
    tokens: Vec<String>,
}

impl SkillTerm {
    fn new(name: &str, case_sensitive: bool) -> Self {
        let needle = if case_sensitive {
            name.to_string()
        } else {
            name.to_lowercase()
        };
        let tokens = tokenize(&needle).into_iter().map(str::to_string).collect();
        Self {
            name: name.to_string(),
            case_sensitive,
            needle,
            tokens,
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Boundary-aware occurrence test. `text` is the original text and
    /// `lowered` its lower-cased form.
    pub fn occurs_in(&self, text: &str, lowered: &str) -> bool {
        let haystack = if self.case_sensitive { text } else { lowered };
        occurs_with_boundaries(haystack, &self.needle)
    }
}

#[derive(Debug, Clone)]
pub struct Vocabulary {
    terms: Vec<SkillTerm>,
}

impl Vocabulary {
    pub fn curated() -> Self {
        let terms = CURATED_SKILLS
            .iter()
            .map(|name| SkillTerm::new(name, CASE_SENSITIVE_SKILLS.contains(name)))
            .collect();
        Self { terms }
    }

    /// Appends extra terms (case-insensitive), skipping ones already present.
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashSet<String> = self.terms.iter().map(|t| t.name.to_lowercase()).collect();
        for term in extra {
            let term = term.as_ref().trim();
            if term.is_empty() || !seen.insert(term.to_lowercase()) {
                continue;
            }
            self.terms.push(SkillTerm::new(term, false));
        }
        self
    }

    pub fn terms(&self) -> &[SkillTerm] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Canonical spelling of `token` if it is a vocabulary term.
    pub fn canonical(&self, token: &str) -> Option<&str> {
        let lowered = token.trim().to_lowercase();
        self.terms
            .iter()
            .find(|t| t.name.to_lowercase() == lowered)
            .map(|t| t.name.as_str())
    }

    /// Every term occurring in `text`, in vocabulary order.
    pub fn scan(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.terms
            .iter()
            .filter(|term| term.occurs_in(text, &lowered))
            .map(|term| term.name.clone())
            .collect()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::curated()
    }
}

/// Splits text into phrase-matcher tokens: whitespace and list punctuation
/// separate tokens, trailing full stops are dropped.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| {
        c.is_whitespace()
            || matches!(
                c,
                ',' | ';' | ':' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '"' | '•' | '·' | '▪' | '●'
            )
    })
    .map(|token| token.trim_end_matches('.'))
    .filter(|token| !token.is_empty())
    .collect()
}

fn occurs_with_boundaries(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let short = needle.chars().count() <= 2;
    let step = needle.chars().next().map_or(1, char::len_utf8);

    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        let start = from + pos;
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        if is_boundary(before, short) && is_boundary(after, short) {
            return true;
        }
        from = start + step;
    }
    false
}

/// Alphanumerics always glue; for one- or two-letter terms, joining
/// punctuation (`R&D`, `Go-live`, `C++`) does too.
fn is_boundary(neighbour: Option<char>, short: bool) -> bool {
    match neighbour {
        None => true,
        Some(c) if c.is_alphanumeric() => false,
        Some(c) if short => !matches!(c, '&' | '-' | '.' | '\'' | '/' | '+' | '#'),
        Some(_) => true,
    }
}
