//! Pure apportionment domain logic

pub mod apportion;

pub use apportion::{
    apportion, apportion_item, LABEL_BASE_REDUZIDA, LABEL_CREDITO_OUTORGADO, LABEL_PADRAO,
    LABEL_SEM_REGRA,
};
