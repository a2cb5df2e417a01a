pub mod entity {
    use std::collections::BTreeSet;

    use serde::{Deserialize, Serialize};

    use super::attribute::{JobLevel, Location, OrgPath, PersonalityType};

    pub type Id = u64;
    pub type Tag = String;

    pub const MAX_TAGS: usize = 10;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct Embeddings {
        pub profile: Option<Vec<f32>>,
        pub collaboration: Option<Vec<f32>>,
        pub strengths: Option<Vec<f32>>,
        pub preferred_colleague: Option<Vec<f32>>,
    }

    /// A member record as supplied by the caller. Attribute fields hold the raw
    /// values; typed views are resolved on demand and never written back.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Member {
        pub id: Id,
        #[serde(default)]
        pub name: String,
        #[serde(default)]
        pub department: Option<String>,
        #[serde(default)]
        pub job_level: Option<String>,
        #[serde(default)]
        pub location: Option<String>,
        #[serde(default)]
        pub personality: Option<String>,
        #[serde(default)]
        pub tags: BTreeSet<Tag>,
        #[serde(default)]
        pub embeddings: Embeddings,
    }

    impl Member {
        pub fn new(id: Id, name: impl Into<String>) -> Member {
            Member {
                id,
                name: name.into(),
                department: None,
                job_level: None,
                location: None,
                personality: None,
                tags: BTreeSet::new(),
                embeddings: Embeddings::default(),
            }
        }

        pub fn with_department(mut self, department: impl Into<String>) -> Member {
            self.department = Some(department.into());
            self
        }

        pub fn with_job_level(mut self, job_level: impl Into<String>) -> Member {
            self.job_level = Some(job_level.into());
            self
        }

        pub fn with_location(mut self, location: impl Into<String>) -> Member {
            self.location = Some(location.into());
            self
        }

        pub fn with_personality(mut self, code: impl Into<String>) -> Member {
            self.personality = Some(code.into());
            self
        }

        /// Only the first `MAX_TAGS` tags are kept.
        pub fn with_tags<I, S>(mut self, tags: I) -> Member
        where
            I: IntoIterator<Item = S>,
            S: Into<Tag>,
        {
            self.tags = tags.into_iter().take(MAX_TAGS).map(Into::into).collect();
            self
        }

        pub fn with_profile_embedding(mut self, vector: Vec<f32>) -> Member {
            self.embeddings.profile = Some(vector);
            self
        }

        pub fn org_path(&self) -> Option<OrgPath> {
            self.department.as_deref().and_then(OrgPath::parse)
        }

        /// Top-level organizational unit, normalised for grouping.
        pub fn top_unit(&self) -> Option<String> {
            self.org_path().map(|path| path.top().to_lowercase())
        }

        pub fn job(&self) -> Option<JobLevel> {
            self.job_level.as_deref().and_then(JobLevel::resolve)
        }

        pub fn place(&self) -> Option<Location> {
            self.location.as_deref().and_then(Location::parse)
        }

        pub fn personality_type(&self) -> Option<PersonalityType> {
            self.personality.as_deref().and_then(PersonalityType::parse)
        }

        pub fn display_name(&self) -> String {
            if self.name.is_empty() {
                format!("member-{}", self.id)
            } else {
                self.name.clone()
            }
        }
    }
}


pub mod attribute {
    use crate::tables;

    fn normalize(raw: &str) -> String {
        raw.trim()
            .to_lowercase()
            .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Hierarchical organizational path, e.g. `Engineering/Platform/SRE`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct OrgPath {
        levels: Vec<String>,
    }

    impl OrgPath {
        pub fn parse(raw: &str) -> Option<OrgPath> {
            let levels: Vec<String> = raw
                .split(|c: char| c == '/' || c == '>')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            if levels.is_empty() {
                None
            } else {
                Some(OrgPath { levels })
            }
        }

        pub fn top(&self) -> &str {
            &self.levels[0]
        }

        pub fn depth(&self) -> usize {
            self.levels.len()
        }

        /// Number of leading levels both paths share (case-insensitive).
        pub fn shared_prefix(&self, other: &OrgPath) -> usize {
            self.levels
                .iter()
                .zip(other.levels.iter())
                .take_while(|(a, b)| a.eq_ignore_ascii_case(b))
                .count()
        }

        pub fn is_same_path(&self, other: &OrgPath) -> bool {
            self.depth() == other.depth() && self.shared_prefix(other) == self.depth()
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Track {
        General,
        Engineering,
        Research,
        Management,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Position {
        Intern,
        Associate,
        Senior,
        Staff,
        Principal,
        Researcher,
        SeniorResearcher,
        ResearchFellow,
        Manager,
        Director,
        Executive,
    }

    impl Position {
        pub fn rank(self) -> u8 {
            match self {
                Position::Intern => 1,
                Position::Associate => 2,
                Position::Senior | Position::Researcher => 3,
                Position::Staff | Position::SeniorResearcher | Position::Manager => 4,
                Position::Principal | Position::ResearchFellow | Position::Director => 5,
                Position::Executive => 6,
            }
        }

        pub fn track(self) -> Track {
            match self {
                Position::Intern => Track::General,
                Position::Associate | Position::Senior | Position::Staff | Position::Principal => {
                    Track::Engineering
                }
                Position::Researcher | Position::SeniorResearcher | Position::ResearchFellow => {
                    Track::Research
                }
                Position::Manager | Position::Director | Position::Executive => Track::Management,
            }
        }

        pub fn title(self) -> &'static str {
            match self {
                Position::Intern => "intern",
                Position::Associate => "associate",
                Position::Senior => "senior",
                Position::Staff => "staff",
                Position::Principal => "principal",
                Position::Researcher => "researcher",
                Position::SeniorResearcher => "senior researcher",
                Position::ResearchFellow => "research fellow",
                Position::Manager => "manager",
                Position::Director => "director",
                Position::Executive => "executive",
            }
        }

        fn from_title(title: &str) -> Option<Position> {
            let position = match title {
                "intern" => Position::Intern,
                "associate" | "junior" => Position::Associate,
                "senior" => Position::Senior,
                "staff" => Position::Staff,
                "principal" => Position::Principal,
                "researcher" | "research scientist" => Position::Researcher,
                "senior researcher" => Position::SeniorResearcher,
                "research fellow" | "fellow" => Position::ResearchFellow,
                "manager" | "team manager" => Position::Manager,
                "director" => Position::Director,
                "executive" | "vp" | "vice president" => Position::Executive,
                _ => return None,
            };
            Some(position)
        }
    }

    /// Coarse families shared by legacy free-text roles and current positions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum RoleFamily {
        Technical,
        Creative,
        Business,
        People,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum JobLevel {
        Position(Position),
        LegacyRole(String),
    }

    impl JobLevel {
        pub fn resolve(raw: &str) -> Option<JobLevel> {
            let label = normalize(raw);
            if label.is_empty() {
                return None;
            }
            Some(match Position::from_title(&label) {
                Some(position) => JobLevel::Position(position),
                None => JobLevel::LegacyRole(label),
            })
        }

        pub fn label(&self) -> &str {
            match self {
                JobLevel::Position(position) => position.title(),
                JobLevel::LegacyRole(label) => label,
            }
        }

        pub fn family(&self) -> Option<RoleFamily> {
            match self {
                JobLevel::Position(position) => match position.track() {
                    Track::General => None,
                    Track::Engineering | Track::Research => Some(RoleFamily::Technical),
                    Track::Management => Some(RoleFamily::People),
                },
                JobLevel::LegacyRole(label) => tables::legacy_role_family(label),
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum MetroGroup {
        Capital,
        Regional,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub enum Location {
        Tokyo,
        Kanagawa,
        Saitama,
        Chiba,
        Osaka,
        Kyoto,
        Hyogo,
        Aichi,
        Fukuoka,
        Hokkaido,
        Miyagi,
        Remote,
        Overseas,
        Other(String),
    }

    impl Location {
        pub fn parse(raw: &str) -> Option<Location> {
            let label = normalize(raw);
            let location = match label.as_str() {
                "" => return None,
                "tokyo" => Location::Tokyo,
                "kanagawa" | "yokohama" => Location::Kanagawa,
                "saitama" => Location::Saitama,
                "chiba" => Location::Chiba,
                "osaka" => Location::Osaka,
                "kyoto" => Location::Kyoto,
                "hyogo" | "kobe" => Location::Hyogo,
                "aichi" | "nagoya" => Location::Aichi,
                "fukuoka" => Location::Fukuoka,
                "hokkaido" | "sapporo" => Location::Hokkaido,
                "miyagi" | "sendai" => Location::Miyagi,
                "remote" | "wfh" | "work from home" => Location::Remote,
                "overseas" | "abroad" => Location::Overseas,
                _ => Location::Other(label),
            };
            Some(location)
        }

        pub fn metro_group(&self) -> Option<MetroGroup> {
            match self {
                Location::Tokyo | Location::Kanagawa | Location::Saitama | Location::Chiba => {
                    Some(MetroGroup::Capital)
                }
                Location::Osaka | Location::Kyoto | Location::Hyogo | Location::Aichi => {
                    Some(MetroGroup::Regional)
                }
                _ => None,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Temperament {
        Rational,
        Idealist,
        Guardian,
        Artisan,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PersonalityType(usize);

    impl PersonalityType {
        pub fn parse(raw: &str) -> Option<PersonalityType> {
            let code = raw.trim().to_ascii_uppercase();
            tables::PERSONALITY_CODES
                .iter()
                .position(|c| *c == code)
                .map(PersonalityType)
        }

        pub fn all() -> impl Iterator<Item = PersonalityType> {
            (0..tables::PERSONALITY_CODES.len()).map(PersonalityType)
        }

        pub fn index(self) -> usize {
            self.0
        }

        pub fn code(self) -> &'static str {
            tables::PERSONALITY_CODES[self.0]
        }

        pub fn temperament(self) -> Temperament {
            let code = self.code().as_bytes();
            match (code[1], code[2], code[3]) {
                (b'N', b'T', _) => Temperament::Rational,
                (b'N', _, _) => Temperament::Idealist,
                (_, _, b'J') => Temperament::Guardian,
                _ => Temperament::Artisan,
            }
        }
    }
}


pub mod condition {
    use serde::{Deserialize, Serialize};

    pub type Score = f64;

    /// Empty lists are ignored.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct Preferences {
        pub departments: Vec<String>,
        pub job_levels: Vec<String>,
        pub locations: Vec<String>,
        pub personality_types: Vec<String>,
    }

    impl Preferences {
        pub fn is_empty(&self) -> bool {
            self.departments.is_empty()
                && self.job_levels.is_empty()
                && self.locations.is_empty()
                && self.personality_types.is_empty()
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Criterion {
        DiverseDepartments,
        SimilarDepartments,
        DiversePersonalities,
        SimilarPersonalities,
        DiverseLocations,
        SimilarLocations,
        MixedLevels,
        SharedInterests,
    }

    impl Criterion {
        pub fn opposite(self) -> Option<Criterion> {
            match self {
                Criterion::DiverseDepartments => Some(Criterion::SimilarDepartments),
                Criterion::SimilarDepartments => Some(Criterion::DiverseDepartments),
                Criterion::DiversePersonalities => Some(Criterion::SimilarPersonalities),
                Criterion::SimilarPersonalities => Some(Criterion::DiversePersonalities),
                Criterion::DiverseLocations => Some(Criterion::SimilarLocations),
                Criterion::SimilarLocations => Some(Criterion::DiverseLocations),
                Criterion::MixedLevels | Criterion::SharedInterests => None,
            }
        }
    }

    /// Resolved grouping intents. At most one flag of each opposing pair is set.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct GroupingCriteria {
        pub diverse_departments: bool,
        pub similar_departments: bool,
        pub diverse_personalities: bool,
        pub similar_personalities: bool,
        pub diverse_locations: bool,
        pub similar_locations: bool,
        pub mixed_levels: bool,
        pub shared_interests: bool,
        pub confidence: f64,
    }

    impl GroupingCriteria {
        /// Builds criteria from flags in the order they were stated; a later flag
        /// clears its opposite.
        pub fn from_ordered<I: IntoIterator<Item = Criterion>>(flags: I) -> GroupingCriteria {
            let mut criteria = GroupingCriteria::default();
            for flag in flags {
                if let Some(opposite) = flag.opposite() {
                    *criteria.flag_mut(opposite) = false;
                }
                *criteria.flag_mut(flag) = true;
            }
            criteria
        }

        pub fn with_confidence(mut self, confidence: f64) -> GroupingCriteria {
            self.confidence = confidence.clamp(0.0, 1.0);
            self
        }

        pub fn is_set(&self, criterion: Criterion) -> bool {
            match criterion {
                Criterion::DiverseDepartments => self.diverse_departments,
                Criterion::SimilarDepartments => self.similar_departments,
                Criterion::DiversePersonalities => self.diverse_personalities,
                Criterion::SimilarPersonalities => self.similar_personalities,
                Criterion::DiverseLocations => self.diverse_locations,
                Criterion::SimilarLocations => self.similar_locations,
                Criterion::MixedLevels => self.mixed_levels,
                Criterion::SharedInterests => self.shared_interests,
            }
        }

        fn flag_mut(&mut self, criterion: Criterion) -> &mut bool {
            match criterion {
                Criterion::DiverseDepartments => &mut self.diverse_departments,
                Criterion::SimilarDepartments => &mut self.similar_departments,
                Criterion::DiversePersonalities => &mut self.diverse_personalities,
                Criterion::SimilarPersonalities => &mut self.similar_personalities,
                Criterion::DiverseLocations => &mut self.diverse_locations,
                Criterion::SimilarLocations => &mut self.similar_locations,
                Criterion::MixedLevels => &mut self.mixed_levels,
                Criterion::SharedInterests => &mut self.shared_interests,
            }
        }

        pub fn active(&self) -> Vec<Criterion> {
            ALL_CRITERIA.iter().copied().filter(|c| self.is_set(*c)).collect()
        }

        pub fn any_diverse(&self) -> bool {
            self.diverse_departments || self.diverse_personalities || self.diverse_locations
        }
    }

    pub const ALL_CRITERIA: [Criterion; 8] = [
        Criterion::DiverseDepartments,
        Criterion::SimilarDepartments,
        Criterion::DiversePersonalities,
        Criterion::SimilarPersonalities,
        Criterion::DiverseLocations,
        Criterion::SimilarLocations,
        Criterion::MixedLevels,
        Criterion::SharedInterests,
    ];
}


pub mod group {
    use serde::{Deserialize, Serialize};

    use super::entity::Id;

    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Diversity {
        pub departments: usize,
        pub personality_types: usize,
        pub locations: usize,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Team {
        pub index: usize,
        pub members: Vec<Id>,
        pub diversity: Diversity,
        pub average_fit: f64,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct Partition {
        pub teams: Vec<Team>,
        pub remainder: Vec<Id>,
    }

    impl Partition {
        pub fn member_count(&self) -> usize {
            self.teams.iter().map(|t| t.members.len()).sum::<usize>() + self.remainder.len()
        }
    }
}


#[cfg(test)]
mod tests {
    use super::attribute::*;
    use super::condition::*;
    use super::entity::Member;

    #[test]
    fn org_path_parses_and_compares() {
        let a = OrgPath::parse("Engineering / Platform / SRE").unwrap();
        let b = OrgPath::parse("engineering>platform").unwrap();
        assert_eq!(a.top(), "Engineering");
        assert_eq!(a.depth(), 3);
        assert_eq!(a.shared_prefix(&b), 2);
        assert!(!a.is_same_path(&b));
        assert!(OrgPath::parse(" / ").is_none());
    }

    #[test]
    fn job_level_resolves_positions_and_legacy_labels() {
        assert_eq!(JobLevel::resolve("Senior_Researcher"), Some(JobLevel::Position(Position::SeniorResearcher)));
        assert_eq!(JobLevel::resolve("  Designer "), Some(JobLevel::LegacyRole("designer".into())));
        assert_eq!(JobLevel::resolve("   "), None);
    }

    #[test]
    fn location_groups() {
        assert_eq!(Location::parse("Yokohama"), Some(Location::Kanagawa));
        assert_eq!(Location::parse("Kobe").unwrap().metro_group(), Some(MetroGroup::Regional));
        assert_eq!(Location::parse("Berlin"), Some(Location::Other("berlin".into())));
    }

    #[test]
    fn personality_codes_and_temperaments() {
        let intj = PersonalityType::parse("intj").unwrap();
        assert_eq!(intj.code(), "INTJ");
        assert_eq!(intj.temperament(), Temperament::Rational);
        assert_eq!(PersonalityType::parse("ENFP").unwrap().temperament(), Temperament::Idealist);
        assert_eq!(PersonalityType::parse("ISTJ").unwrap().temperament(), Temperament::Guardian);
        assert_eq!(PersonalityType::parse("ESFP").unwrap().temperament(), Temperament::Artisan);
        assert!(PersonalityType::parse("XXXX").is_none());
        assert_eq!(PersonalityType::all().count(), 16);
    }

    #[test]
    fn later_criterion_wins() {
        let criteria = GroupingCriteria::from_ordered([
            Criterion::DiverseDepartments,
            Criterion::MixedLevels,
            Criterion::SimilarDepartments,
        ]);
        assert!(criteria.similar_departments);
        assert!(!criteria.diverse_departments);
        assert_eq!(criteria.active(), vec![Criterion::SimilarDepartments, Criterion::MixedLevels]);
    }

    #[test]
    fn member_tags_are_bounded() {
        let member = Member::new(1, "a").with_tags((0..20).map(|i| format!("t{i}")));
        assert_eq!(member.tags.len(), 10);
        assert_eq!(Member::new(7, "").display_name(), "member-7");
    }
}
