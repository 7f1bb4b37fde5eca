//! Static NCDC lower-secondary syllabus
//!
//! Subjects and their topics per class level. Lookups are pure and
//! allocation happens only when topics are materialized.

use serde::Serialize;

use crate::value_objects::ClassLevel;

/// Application display name
pub const APP_NAME: &str = "Pearl Notes";

/// Number of placeholder topics for a subject/class without syllabus data
const FALLBACK_TOPIC_COUNT: usize = 8;

/// A curriculum subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: &'static str,
    pub name: &'static str,
    pub icon_name: &'static str,
    pub image_seed: &'static str,
    pub description: &'static str,
}

/// A syllabus topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// `<subjectId>-<classLevel>-<index>`
    pub id: String,
    pub name: String,
    pub subject_id: String,
    pub class_level: ClassLevel,
}

impl Topic {
    fn new(subject_id: &str, class_level: ClassLevel, index: usize, name: impl Into<String>) -> Self {
        Self {
            id: format!("{subject_id}-{class_level}-{index}"),
            name: name.into(),
            subject_id: subject_id.to_string(),
            class_level,
        }
    }
}

const fn subject(
    id: &'static str,
    name: &'static str,
    icon_name: &'static str,
    image_seed: &'static str,
    description: &'static str,
) -> Subject {
    Subject {
        id,
        name,
        icon_name,
        image_seed,
        description,
    }
}

static SUBJECTS: [Subject; 12] = [
    subject("math", "Mathematics", "Calculator", "mathematics", "Numbers, Algebra, Geometry & Statistics"),
    subject("english", "English Language", "BookOpen", "library", "Grammar, Comprehension & Literature"),
    subject("biology", "Biology", "Dna", "biology", "Life, Cells, Plants & Animals"),
    subject("chemistry", "Chemistry", "FlaskConical", "chemistry", "Matter, Reactions & Elements"),
    subject("physics", "Physics", "Atom", "physics", "Energy, Motion & Forces"),
    subject("geography", "Geography", "Globe", "geography", "Maps, Physical & Human Geography"),
    subject("history", "History", "Scroll", "history", "East Africa, Politics & Government"),
    subject("re", "Religious Education", "Cross", "religion", "CRE & IRE Curriculum"),
    subject("ent", "Entrepreneurship", "Briefcase", "business", "Business Skills & Innovation"),
    subject("ict", "ICT", "Monitor", "computer", "Computer Studies & Digital Literacy"),
    subject("pe", "Physical Education", "Activity", "sports", "Health, Fitness & Sports"),
    subject("kiswahili", "Kiswahili", "Languages", "language", "Fasihi & Grammar"),
];

/// All subjects in display order
pub fn subjects() -> &'static [Subject] {
    &SUBJECTS
}

/// Look up a subject by its id (e.g. `"biology"`)
pub fn subject_by_id(id: &str) -> Option<&'static Subject> {
    SUBJECTS.iter().find(|s| s.id == id)
}

/// Look up a subject by display name, ignoring case
pub fn subject_by_name(name: &str) -> Option<&'static Subject> {
    let name = name.trim();
    SUBJECTS.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

/// Resolve a subject given either its id or its display name
pub fn resolve_subject(id_or_name: &str) -> Option<&'static Subject> {
    subject_by_id(id_or_name).or_else(|| subject_by_name(id_or_name))
}

/// Topics of a subject for one class level, in syllabus order.
///
/// Unmapped subject/class pairs yield placeholder topics.
pub fn topics_for(subject_id: &str, class_level: ClassLevel) -> Vec<Topic> {
    match topic_names(subject_id, class_level) {
        Some(names) => names
            .iter()
            .enumerate()
            .map(|(i, name)| Topic::new(subject_id, class_level, i, *name))
            .collect(),
        None => (0..FALLBACK_TOPIC_COUNT)
            .map(|i| Topic::new(subject_id, class_level, i, format!("Topic {} ({class_level})", i + 1)))
            .collect(),
    }
}

fn topic_names(subject_id: &str, class_level: ClassLevel) -> Option<&'static [&'static str]> {
    SYLLABUS
        .iter()
        .find(|(id, _)| *id == subject_id)
        .map(|(_, levels)| levels[class_level.index()])
}

/// Syllabus spelling of a topic name for a subject and class, ignoring case
/// and surrounding whitespace
pub fn canonical_topic_name(subject_id: &str, class_level: ClassLevel, name: &str) -> Option<&'static str> {
    let wanted = name.trim().to_lowercase();
    topic_names(subject_id, class_level)?
        .iter()
        .copied()
        .find(|candidate| candidate.to_lowercase() == wanted)
}

/// Case-insensitive substring search over topic and subject names.
///
/// A subject-name match returns every topic of that subject. Results are
/// ordered by subject, then class level, then topic position.
pub fn search(query: &str) -> Vec<Topic> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut hits = Vec::new();
    for subject in &SUBJECTS {
        let subject_hit = subject.name.to_lowercase().contains(&needle);
        for level in ClassLevel::ALL {
            hits.extend(
                topics_for(subject.id, level)
                    .into_iter()
                    .filter(|t| subject_hit || t.name.to_lowercase().contains(&needle)),
            );
        }
    }
    hits
}

const SYLLABUS: &[(&str, [&[&str]; 4])] = &[
    (
        "math",
        [
            &[
                "Operations on Numbers",
                "Bases and Place Values",
                "Sets and Set Operations",
                "Patterns and Sequences",
                "Fractions, Decimals and Percentages",
                "Integers",
                "Rectangular Cartesian Coordinates",
                "Reflection",
                "Lines, Angles and Polygons",
                "Bearings",
                "Data Collection and Presentation",
                "Time and Transport Schedules",
                "Length, Mass and Capacity",
            ],
            &[
                "Mappings and Relations",
                "Linear Equations and Inequalities",
                "Indices and Logarithms",
                "Approximation and Estimation",
                "Circumference and Area",
                "Volume and Surface Area",
                "Similarity and Enlargement",
                "Rotation",
                "Business Arithmetic (Interest, Discount)",
                "Construction of Geometric Figures",
                "Probability (Intro)",
            ],
            &[
                "Matrices",
                "Vectors",
                "Composite Functions",
                "Quadratic Equations",
                "Surds",
                "Circle Properties",
                "Trigonometry (SOHCAHTOA)",
                "Compound Interest",
                "Matrices and Transformations",
                "Linear Programming (Intro)",
                "Income Tax",
            ],
            &[
                "Probability",
                "Statistics (Mean, Mode, Median, Pie Charts)",
                "Linear Programming (Optimization)",
                "Three Dimensional Geometry",
                "Latitude and Longitude",
                "Matrices (Transformation)",
                "Differentiation (Intro)",
                "Integration (Intro)",
                "Revision and Past Papers",
                "Examination Techniques",
            ],
        ],
    ),
    (
        "biology",
        [
            &[
                "Introduction to Biology",
                "Diversity of Living Things (Classification)",
                "The Cell (Structure and Function)",
                "Levels of Organization",
                "Insects and Vectors",
                "Flowering Plants (Structure)",
                "Tools used in Biology",
                "Safety in the Laboratory",
            ],
            &[
                "Soil Composition and Properties",
                "Nutrition in Plants (Photosynthesis)",
                "Nutrition in Animals (Digestion)",
                "Transport in Plants",
                "Transport in Animals (Circulatory System)",
                "Gaseous Exchange (Respiration)",
                "Food Tests",
            ],
            &[
                "Respiration (Aerobic/Anaerobic)",
                "Excretion and Homeostasis",
                "Coordination and Control (Nervous/Hormonal)",
                "Locomotion and Support",
                "Growth and Development",
                "The Human Eye and Ear",
            ],
            &[
                "Reproduction in Plants",
                "Reproduction in Animals",
                "Genetics and Inheritance",
                "Evolution and Variation",
                "Interrelationships (Ecology)",
                "Population Dynamics",
                "Applied Biology",
                "Mitosis and Meiosis",
            ],
        ],
    ),
    (
        "chemistry",
        [
            &[
                "Introduction to Chemistry",
                "States of Matter",
                "Mixtures and Methods of Separation",
                "Air and Combustion",
                "Water and Hydrogen",
                "Simple Acid-Base Indicators",
                "Laboratory Apparatus and Safety",
            ],
            &[
                "Atomic Structure",
                "The Periodic Table",
                "Chemical Bonding",
                "Chemical Families and Patterns",
                "Structure and Properties of Matter",
                "Acids, Bases and Salts",
                "Preparation of Salts",
            ],
            &[
                "The Mole Concept",
                "Chemical Equations and Stoichiometry",
                "Carbon and its Compounds",
                "Nitrogen and its Compounds",
                "Sulphur and its Compounds",
                "Chlorine and its Compounds",
                "Quantitative Analysis (Titration)",
            ],
            &[
                "Electrochemistry (Electrolysis)",
                "Energy Changes in Chemical Reactions",
                "Rates of Reaction",
                "Chemical Equilibria",
                "Organic Chemistry (Intro)",
                "Applied Chemistry (Polymers, Soaps)",
                "Metals and Extraction",
            ],
        ],
    ),
    (
        "physics",
        [
            &[
                "Introduction to Physics",
                "Measurements (Length, Area, Volume)",
                "States of Matter",
                "Effects of Force (Stretching, Friction)",
                "Density and Pressure",
                "Temperature and Thermometers",
                "Simple Kinetic Theory",
            ],
            &[
                "Turning Effect of Forces (Moments)",
                "Center of Gravity",
                "Work, Energy and Power",
                "Machines",
                "Light (Reflection at Plane Surfaces)",
                "Structure of Matter",
                "Heat Transfer",
                "Linear Expansivity",
            ],
            &[
                "Linear Motion",
                "Newton’s Laws of Motion",
                "Refraction of Light",
                "Lenses and Optical Instruments",
                "Waves",
                "Sound",
                "Electrostatics (Static Electricity)",
                "Electric Circuits",
            ],
            &[
                "Current Electricity",
                "Magnetism",
                "Electromagnetism",
                "Electronics",
                "Radioactivity (Nuclear Physics)",
                "X-Rays",
                "Modern Physics",
                "Earthquakes and Gravity",
            ],
        ],
    ),
    (
        "geography",
        [
            &[
                "Introduction to Geography",
                "Map Reading and Interpretation",
                "The Earth and the Solar System",
                "Weather and Climate",
                "Rocks and Landforms",
                "Mining in East Africa",
            ],
            &[
                "East Africa: Location and Size",
                "East Africa: Physical Features",
                "East Africa: Climate and Vegetation",
                "East Africa: Population",
                "East Africa: Agriculture and Mining",
                "East Africa: Transport and Trade",
                "East Africa: Industry and Tourism",
            ],
            &[
                "North America: British Columbia",
                "North America: New York",
                "North America: The South",
                "Development Studies",
                "Map Reading (Photography)",
                "Fieldwork Techniques",
                "Glaciation",
            ],
            &[
                "The Rhinelands",
                "Switzerland",
                "Belgium",
                "China (Communes)",
                "Photography and Map Analysis",
                "Population Studies (Global)",
                "Urbanization and Settlement",
            ],
        ],
    ),
    (
        "history",
        [
            &[
                "The Concept of History",
                "Sources of African History",
                "Origin of Man in East Africa",
                "Migration and Settlement in East Africa",
                "Social, Political and Economic Organization of E. African Societies",
                "Long Distance Trade",
            ],
            &[
                "Inter-Regional Trade (Long Distance Trade)",
                "Scramble and Partition of East Africa",
                "Response to Colonial Rule (Resistance)",
                "Establishment of Colonial Rule",
                "Colonial Administrative Systems",
                "The Uganda Railway",
            ],
            &[
                "Social and Economic Developments in Colonial East Africa",
                "Rise of Nationalism in East Africa",
                "Formation of Political Parties",
                "Road to Independence in Uganda, Kenya, Tanzania",
                "The Kabaka Crisis",
            ],
            &[
                "Post-Independence Developments",
                "Challenges of Independence",
                "World Wars and their Effects on East Africa",
                "International Organizations (UN, AU, EAC)",
                "Nation Building",
                "The Cold War Effects on Africa",
            ],
        ],
    ),
    (
        "english",
        [
            &[
                "Parts of Speech",
                "Tenses (Present and Past)",
                "Punctuation",
                "Sentence Construction",
                "Reading Comprehension Skills",
                "Oral Literature: Riddles and Proverbs",
                "Informal Letter Writing",
                "Descriptive Writing",
            ],
            &[
                "Direct and Indirect Speech",
                "Active and Passive Voice",
                "Adjectives and Adverbs",
                "Vocabulary Building",
                "Summary Writing (Intro)",
                "Formal Letter Writing",
                "Oral Literature: Myths",
                "Notice and Poster Writing",
            ],
            &[
                "Conditionals (If clauses)",
                "Relative Clauses",
                "Report Writing",
                "Speech Writing",
                "Poetry Analysis",
                "Novel/Play Study",
                "Creative Writing (Narrative)",
                "Debates and Arguments",
            ],
            &[
                "Complex Sentence Structures",
                "Argumentative Essay Writing",
                "Minute Writing",
                "Advanced Comprehension",
                "Literary Analysis",
                "Examination Techniques",
                "Memorandum Writing",
            ],
        ],
    ),
    (
        "ict",
        [
            &[
                "Introduction to ICT",
                "Computer Hardware",
                "Computer Software",
                "Keyboard Skills",
                "Introduction to Windows",
                "Care and Safety of Computers",
            ],
            &[
                "File Management",
                "Word Processing (Basic)",
                "Internet and Email",
                "Computer Security",
                "Health and Safety",
                "Impact of ICT on Society",
            ],
            &[
                "Spreadsheets (Excel)",
                "Presentations (PowerPoint)",
                "Data Communication",
                "Ethical Issues in ICT",
                "Networking Basics",
            ],
            &[
                "Database Management",
                "Web Design (HTML Basic)",
                "Desktop Publishing",
                "Future Trends in ICT",
                "System Analysis (Intro)",
            ],
        ],
    ),
    (
        "ent",
        [
            &[
                "Meaning of Entrepreneurship",
                "Personal Branding",
                "Creativity and Innovation",
                "Savings and Investment",
                "The Market",
            ],
            &[
                "Business Planning",
                "Market Research",
                "Types of Business Organizations",
                "Bookkeeping Basics",
                "Business Ethics",
            ],
            &[
                "Marketing Strategies",
                "Financial Management",
                "Business Ethics",
                "Taxes in Uganda",
                "Insurance in Business",
            ],
            &[
                "Writing a Business Plan",
                "Risk Management",
                "Capital Markets",
                "Starting a Business Project",
                "Production Management",
            ],
        ],
    ),
    (
        "pe",
        [
            &[
                "Introduction to Physical Education",
                "Physical Fitness and Health",
                "Gymnastics (Basic Floor Exercises)",
                "Athletics (Sprints and Relays)",
                "Football (Basic Skills)",
                "Netball (Footwork and Passing)",
            ],
            &[
                "Human Anatomy in Sports",
                "First Aid and Safety",
                "Athletics (Long Jump and High Jump)",
                "Volleyball (Service and Digging)",
                "Basketball (Dribbling and Shooting)",
                "Traditional Games",
            ],
            &[
                "Physiology of Exercise",
                "Athletics (Throws: Shot Put, Discus)",
                "Rugby (Tag and Contact)",
                "Handball",
                "Swimming (Safety and Strokes)",
                "Racket Games (Badminton/Table Tennis)",
            ],
            &[
                "Sports Management and Administration",
                "Training Methods and Principles",
                "Rules and Officiating",
                "Contemporary Issues in Sports",
                "Biomechanics (Levers and Motion)",
                "Career Opportunities in Sports",
            ],
        ],
    ),
    (
        "re",
        [
            &[
                "Worship and Prayer",
                "The Holy Scriptures",
                "Creation and Fall",
                "African Traditional Heritage",
                "Family and Community",
                "Respect for Life",
            ],
            &[
                "The Old Testament History",
                "Prophets and Prophecies",
                "The Early Church/Islamic History",
                "Rituals and Festivals",
                "Moral Values in Society",
                "Loyalty",
            ],
            &[
                "Happiness and Success",
                "Freedom and Responsibility",
                "Search for Meaning",
                "Marriage and Family Life",
                "Human Rights and Dignity",
                "Authority and Service",
            ],
            &[
                "Man in Changing Society",
                "Work, Leisure and Money",
                "Law, Order and Justice",
                "Peace and Conflict Resolution",
                "Religion and Science",
                "Sex and Gender",
            ],
        ],
    ),
    (
        "kiswahili",
        [
            &[
                "Introduction to Kiswahili (Salamu)",
                "Nouns (Nomino) and Classes",
                "Verbs (Vitenzi)",
                "Tenses (Nyakati)",
                "Common Vocabulary",
                "Pronouns (Viwakilishi)",
            ],
            &[
                "Sentence Construction",
                "Adjectives and Adverbs",
                "Comprehension (Ufahamu)",
                "Composition Writing (Insha)",
                "Proverbs and Idioms (Methali na Nahau)",
                "Direct Speech",
            ],
            &[
                "Introduction to Literature (Fasihi)",
                "Oral Literature (Fasihi Simulizi)",
                "Translation (Tafsiri)",
                "Summary Writing (Ufupisho)",
                "Dialogue and Plays",
                "Poetry Analysis (Intro)",
            ],
            &[
                "Advanced Grammar (Sarufi)",
                "Poetry (Ushairi)",
                "Novel Analysis (Riwaya)",
                "Social Issues in Literature",
                "Revision and Examination Techniques",
                "Creative Writing",
            ],
        ],
    ),
];
