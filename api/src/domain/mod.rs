// Domain rules that do not depend on storage or HTTP

pub mod boost;
