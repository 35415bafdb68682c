pub type CardId = String;

/// A result card. Rendering dispatches on the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Card {
    Company(CompanyCard),
    Person(PersonCard),
}

impl Card {
    pub fn id(&self) -> &str {
        match self {
            Card::Company(company) => &company.id,
            Card::Person(person) => &person.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Card::Company(company) => &company.name,
            Card::Person(person) => &person.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompanyCard {
    pub id: CardId,
    pub name: String,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub founded: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersonCard {
    pub id: CardId,
    pub name: String,
    pub designation: Option<String>,
    pub company: Option<String>,
    pub linkedin_id: String,
    pub linkedin_url: String,
    pub education: Option<String>,
    pub experience_years: Option<u32>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteHit {
    pub card_id: CardId,
    pub card_name: Option<String>,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHit {
    pub card_id: CardId,
    pub filename: String,
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResults {
    pub companies: Vec<CompanyCard>,
    pub persons: Vec<PersonCard>,
    pub notes: Vec<NoteHit>,
    pub documents: Vec<DocumentHit>,
}

impl SearchResults {
    /// Partitions a mixed card list, keeping the relative order of each kind.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut results = Self::default();
        for card in cards {
            match card {
                Card::Company(company) => results.companies.push(company),
                Card::Person(person) => results.persons.push(person),
            }
        }
        results
    }

    /// Companies first, then persons.
    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.companies
            .iter()
            .cloned()
            .map(Card::Company)
            .chain(self.persons.iter().cloned().map(Card::Person))
    }

    pub fn contains_card(&self, card_id: &str) -> bool {
        self.companies.iter().any(|company| company.id == card_id)
            || self.persons.iter().any(|person| person.id == card_id)
    }

    pub fn card_count(&self) -> usize {
        self.companies.len() + self.persons.len()
    }

    pub fn total(&self) -> usize {
        self.card_count() + self.notes.len() + self.documents.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
    /// Category tag, e.g. `company` or `person`.
    pub kind: String,
    pub id: String,
}
