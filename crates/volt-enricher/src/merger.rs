//! Field-level arbitration between source records

use volt_domain::{
    same_name, CanonicalEntity, CompetitorNote, EnrichedCompany, FieldName, PartialRecord, Person,
};

const SCALAR_FIELDS: [FieldName; 4] = [
    FieldName::Website,
    FieldName::Sector,
    FieldName::HqLocation,
    FieldName::Description,
];

/// Merge source records into one company
///
/// Records are ranked by confidence (stable, so equal-confidence records keep
/// their order). Each scalar takes the value of the highest-ranked record that
/// provides it. List fields are a union de-duplicated case-insensitively by
/// name; the first occurrence wins, though a later one may fill a missing
/// role or note. `sources` names, per field, the highest-ranked contributor.
/// The canonical name is never replaced; alternate names only extend aliases.
pub fn merge(entity: &CanonicalEntity, records: &[PartialRecord]) -> EnrichedCompany {
    let mut ranked: Vec<&PartialRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.confidence.cmp(&a.confidence));

    let mut company = EnrichedCompany::from_entity(entity);

    for field in SCALAR_FIELDS {
        let winner = ranked
            .iter()
            .find_map(|r| r.fields.scalar(field).map(|value| (value, &r.source)));
        if let Some((value, source)) = winner {
            let slot = match field {
                FieldName::Website => &mut company.website,
                FieldName::Sector => &mut company.sector,
                FieldName::HqLocation => &mut company.hq_location,
                _ => &mut company.description,
            };
            *slot = Some(value.to_string());
            company.sources.insert(field, source.clone());
        }
    }

    for record in &ranked {
        let mut contributed = false;
        for person in &record.fields.key_people {
            contributed |= union_person(&mut company.key_people, person);
        }
        if contributed {
            company
                .sources
                .entry(FieldName::KeyPeople)
                .or_insert_with(|| record.source.clone());
        }

        let mut contributed = false;
        for competitor in &record.fields.competitors {
            contributed |= union_competitor(&mut company.competitors, competitor);
        }
        if contributed {
            company
                .sources
                .entry(FieldName::Competitors)
                .or_insert_with(|| record.source.clone());
        }

        for alternate in &record.fields.alternate_names {
            add_alias(&mut company, alternate);
        }
    }

    company
}

/// Insert or enrich a person; true if the list changed
fn union_person(people: &mut Vec<Person>, candidate: &Person) -> bool {
    let name = candidate.name.trim();
    if name.is_empty() {
        return false;
    }
    let role = non_blank(&candidate.role);
    match people.iter_mut().find(|p| same_name(&p.name, name)) {
        Some(existing) => {
            if existing.role.is_none() && role.is_some() {
                existing.role = role;
                return true;
            }
            false
        }
        None => {
            people.push(Person { name: name.to_string(), role });
            true
        }
    }
}

/// Insert or enrich a competitor; true if the list changed
fn union_competitor(competitors: &mut Vec<CompetitorNote>, candidate: &CompetitorNote) -> bool {
    let name = candidate.name.trim();
    if name.is_empty() {
        return false;
    }
    let note = non_blank(&candidate.note);
    match competitors.iter_mut().find(|c| same_name(&c.name, name)) {
        Some(existing) => {
            if existing.note.is_none() && note.is_some() {
                existing.note = note;
                return true;
            }
            false
        }
        None => {
            competitors.push(CompetitorNote { name: name.to_string(), note });
            true
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn add_alias(company: &mut EnrichedCompany, alternate: &str) {
    let alternate = alternate.trim();
    if alternate.is_empty()
        || same_name(&company.name, alternate)
        || company.aliases.iter().any(|a| same_name(a, alternate))
    {
        return;
    }
    company.aliases.push(alternate.to_string());
}
