//! User-facing Czech messages.

pub const ENTITY_NOT_FOUND: &str = "Entita nebyla nalezena.";
pub const TEMPLATE_NOT_FOUND: &str = "Template nebyl nalezen.";
pub const PAGE_NOT_FOUND: &str = "Stránka nebyla nalezena.";
pub const ENTITY_NAME_REQUIRED: &str = "Název entity je povinný.";
pub const ENTITIES_CLEARED: &str = "Všechny entity byly smazány.";
pub const NO_ENTITIES_DEFINED: &str = "Nejdříve vytvořte některé entity v Blueprint designeru.";
pub const NOTHING_TO_PRICE: &str = "Žádné entity k výpočtu ceny.";
pub const PRICING_MISSING: &str = "Nejdříve vygenerujte cenovou nabídku.";
pub const MOCKUP_MISSING: &str = "Nejdříve vygenerujte mockup.";
pub const THEME_UPDATED: &str = "Téma bylo aktualizováno.";
pub const PRICING_CALCULATED: &str = "Cenová nabídka byla vypočítána.";
pub const UNEXPECTED_ERROR: &str = "Vyskytla se neočekávaná chyba. Zkuste to prosím znovu.";

pub fn entity_created(name: &str) -> String {
    format!("Entita '{}' byla úspěšně vytvořena.", name)
}

pub fn entity_updated(name: &str) -> String {
    format!("Entita '{}' byla úspěšně aktualizována.", name)
}

pub fn entity_deleted(name: &str) -> String {
    format!("Entita '{}' byla smazána.", name)
}

pub fn entity_quick_added(name: &str) -> String {
    format!("Entita '{}' byla rychle přidána.", name)
}

pub fn template_loaded(name: &str, count: usize) -> String {
    format!("Template '{}' byl načten s {} entitami.", name, count)
}
