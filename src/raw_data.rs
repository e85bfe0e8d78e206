pub const IPA_DATA_NAME: &str = "ipa.dat";

pub const IPA_DATA: &str = include_str!("../data/ipa.dat");
