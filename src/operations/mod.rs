pub mod op_helper;
pub mod probe_op;
pub mod serve_op;
pub mod sweep_op;
