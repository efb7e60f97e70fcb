//! Fixtures
//!
//! The reference service catalog used by demos and integration tests. Prices
//! are whole dollars, expressed in minor units.

use rusty_money::{Money, iso};

use crate::catalog::{Catalog, Service, ServiceId};

/// Build the standard six-service USD catalog.
pub fn sample_catalog() -> Catalog {
    [
        Service {
            id: ServiceId::from("1"),
            name: "Web Development".to_owned(),
            price: Money::from_minor(1_200_00, iso::USD),
            category: "Development".to_owned(),
            rating: 4.8,
            image: "/images/web-dev.jpg".to_owned(),
        },
        Service {
            id: ServiceId::from("2"),
            name: "Mobile App Development".to_owned(),
            price: Money::from_minor(2_500_00, iso::USD),
            category: "Development".to_owned(),
            rating: 4.6,
            image: "/images/app-dev.jpg".to_owned(),
        },
        Service {
            id: ServiceId::from("3"),
            name: "UI/UX Design".to_owned(),
            price: Money::from_minor(800_00, iso::USD),
            category: "Design".to_owned(),
            rating: 4.9,
            image: "/images/ui-ux.png".to_owned(),
        },
        Service {
            id: ServiceId::from("4"),
            name: "SEO Optimization".to_owned(),
            price: Money::from_minor(500_00, iso::USD),
            category: "Marketing".to_owned(),
            rating: 4.7,
            image: "/images/seo-optimisation.jpg".to_owned(),
        },
        Service {
            id: ServiceId::from("5"),
            name: "Content Creation".to_owned(),
            price: Money::from_minor(300_00, iso::USD),
            category: "Content".to_owned(),
            rating: 4.5,
            image: "/images/content-creation.jpg".to_owned(),
        },
        Service {
            id: ServiceId::from("6"),
            name: "Digital Marketing".to_owned(),
            price: Money::from_minor(1_000_00, iso::USD),
            category: "Marketing".to_owned(),
            rating: 4.8,
            image: "/images/digital-marketing.png".to_owned(),
        },
    ]
    .into_iter()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_catalog_has_six_priced_services() {
        let catalog = sample_catalog();

        assert_eq!(catalog.len(), 6);

        let seo = catalog
            .get(&ServiceId::from("4"))
            .expect("SEO service should exist");
        assert_eq!(seo.name, "SEO Optimization");
        assert_eq!(seo.price, Money::from_minor(500_00, iso::USD));
    }
}
