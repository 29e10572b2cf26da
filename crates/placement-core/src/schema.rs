use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    Cgpa,
    Internships,
    Projects,
    CompetitiveRank,
    Branch,
    CodeforcesRating,
    CommunicationSkill,
    ExperienceMonths,
    Age,
    CollegeTag,
    Grade10,
    Grade12,
    Backlogs,
    Gender,
}

pub const ATTRIBUTES: [Attribute; 14] = [
    Attribute::Cgpa,
    Attribute::Internships,
    Attribute::Projects,
    Attribute::CompetitiveRank,
    Attribute::Branch,
    Attribute::CodeforcesRating,
    Attribute::CommunicationSkill,
    Attribute::ExperienceMonths,
    Attribute::Age,
    Attribute::CollegeTag,
    Attribute::Grade10,
    Attribute::Grade12,
    Attribute::Backlogs,
    Attribute::Gender,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Decimal,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    AtLeast(f64),
    GreaterThan(f64),
}

impl Bound {
    pub fn admits(self, value: f64) -> bool {
        match self {
            Self::AtLeast(min) => value >= min,
            Self::GreaterThan(min) => value > min,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Numeric { number: NumberKind, bound: Bound },
    Categorical { choices: &'static [Choice] },
    Slider { min: i64, max: i64, default: i64 },
}

pub const BRANCH_CHOICES: &[Choice] = &[
    Choice {
        value: "CSE",
        label: "Computer Science Engineering",
    },
    Choice {
        value: "ME",
        label: "Mechanical Engineering",
    },
    Choice {
        value: "CE",
        label: "Civil Engineering",
    },
    Choice {
        value: "ECE",
        label: "Electronics & Communication Engineering",
    },
    Choice {
        value: "EE",
        label: "Electrical Engineering",
    },
    Choice {
        value: "IT",
        label: "Information Technology",
    },
];

pub const COLLEGE_CHOICES: &[Choice] = &[
    Choice {
        value: "IIT",
        label: "IIT",
    },
    Choice {
        value: "NIT",
        label: "NIT",
    },
    Choice {
        value: "State_University",
        label: "State_University",
    },
    Choice {
        value: "IIIT",
        label: "IIIT",
    },
    Choice {
        value: "Private_College",
        label: "Private_College",
    },
];

pub const GENDER_CHOICES: &[Choice] = &[
    Choice {
        value: "M",
        label: "Male",
    },
    Choice {
        value: "F",
        label: "Female",
    },
];

const NON_NEGATIVE: Bound = Bound::AtLeast(0.0);

impl Attribute {
    pub fn key(self) -> &'static str {
        match self {
            Self::Cgpa => "CGPA",
            Self::Internships => "Internships",
            Self::Projects => "Projects",
            Self::CompetitiveRank => "CompetitiveRank",
            Self::Branch => "Branch",
            Self::CodeforcesRating => "CodeforcesRating",
            Self::CommunicationSkill => "CommunicationSkill",
            Self::ExperienceMonths => "ExperienceMonths",
            Self::Age => "Age",
            Self::CollegeTag => "CollegeTag",
            Self::Grade10 => "Grade10",
            Self::Grade12 => "Grade12",
            Self::Backlogs => "Backlogs",
            Self::Gender => "Gender",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Cgpa => "CGPA",
            Self::Internships => "Internships",
            Self::Projects => "Projects",
            Self::CompetitiveRank => "Competitive Rank",
            Self::Branch => "Branch",
            Self::CodeforcesRating => "Codeforces Rating",
            Self::CommunicationSkill => "Communication Skill",
            Self::ExperienceMonths => "Experience Months",
            Self::Age => "Age",
            Self::CollegeTag => "College",
            Self::Grade10 => "Grade 10",
            Self::Grade12 => "Grade 12",
            Self::Backlogs => "Backlogs",
            Self::Gender => "Gender",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::Cgpa => FieldKind::Numeric {
                number: NumberKind::Decimal,
                bound: Bound::GreaterThan(0.0),
            },
            Self::Grade10 | Self::Grade12 => FieldKind::Numeric {
                number: NumberKind::Decimal,
                bound: NON_NEGATIVE,
            },
            Self::Internships
            | Self::Projects
            | Self::CompetitiveRank
            | Self::CodeforcesRating
            | Self::ExperienceMonths
            | Self::Backlogs => FieldKind::Numeric {
                number: NumberKind::Count,
                bound: NON_NEGATIVE,
            },
            Self::Age => FieldKind::Numeric {
                number: NumberKind::Count,
                bound: Bound::AtLeast(15.0),
            },
            Self::Branch => FieldKind::Categorical {
                choices: BRANCH_CHOICES,
            },
            Self::CollegeTag => FieldKind::Categorical {
                choices: COLLEGE_CHOICES,
            },
            Self::Gender => FieldKind::Categorical {
                choices: GENDER_CHOICES,
            },
            Self::CommunicationSkill => FieldKind::Slider {
                min: 0,
                max: 100,
                default: 50,
            },
        }
    }

    pub fn default_value(self) -> String {
        match self.kind() {
            FieldKind::Numeric { .. } => String::new(),
            FieldKind::Categorical { choices } => choices
                .first()
                .map(|choice| choice.value.to_string())
                .unwrap_or_default(),
            FieldKind::Slider { default, .. } => default.to_string(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

pub fn choice_index(choices: &[Choice], value: &str) -> Option<usize> {
    choices.iter().position(|choice| choice.value == value)
}
