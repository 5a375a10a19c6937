pub mod operation_result_dto;
