//! Service-layer tests
//!
//! Drive the circulation workflows end to end against the in-memory
//! collaborators.

#[cfg(test)]
mod tests {
    use crate::aggregate::LoanStatus;
    use crate::domain::{Actor, DomainError, LoanEvent, Money, Role};
    use crate::error::ServiceError;
    use crate::service::{
        BorrowerProfile, CheckOutBookCommand, CirculationService, InMemoryBookCatalog,
        InMemoryBorrowerDirectory, InMemoryLoanStore,
    };
    use chrono::Duration;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    struct Fixture {
        service:
            CirculationService<InMemoryBookCatalog, InMemoryBorrowerDirectory, InMemoryLoanStore>,
        loans: InMemoryLoanStore,
        book_id: Uuid,
        member_id: Uuid,
    }

    fn setup() -> Fixture {
        let catalog = InMemoryBookCatalog::new();
        let directory = InMemoryBorrowerDirectory::new();
        let loans = InMemoryLoanStore::new();

        let book_id = Uuid::new_v4();
        catalog.add_book(book_id);

        let member_id = Uuid::new_v4();
        directory.add_borrower(BorrowerProfile::new(member_id, "Ada Lovelace", "ada@example.com"));

        Fixture {
            service: CirculationService::new(catalog.clone(), directory.clone(), loans.clone()),
            loans,
            book_id,
            member_id,
        }
    }

    fn member(id: Uuid) -> Actor {
        Actor::new(id.to_string()).with_role(Role::Member)
    }

    fn librarian() -> Actor {
        Actor::new(Uuid::new_v4().to_string()).with_role(Role::Librarian)
    }

    fn eur(amount: Decimal) -> Money {
        Money::new(amount, "EUR").unwrap()
    }

    #[test]
    fn test_check_out_book() {
        let fx = setup();

        let result = fx
            .service
            .check_out_book(CheckOutBookCommand::new(fx.book_id), &member(fx.member_id))
            .unwrap();

        assert_eq!(result.book_id, fx.book_id);
        assert_eq!(result.borrower_id, fx.member_id);
        assert_eq!(result.events.len(), 1);
        assert!(matches!(result.events[0], LoanEvent::LoanCreated { .. }));

        let loan = fx.service.get_loan(result.loan_id).unwrap();
        assert!(loan.is_active());
        assert_eq!(loan.borrower_name(), "Ada Lovelace");
        assert_eq!(loan.due_date() - loan.loan_date(), Duration::days(14));
    }

    #[test]
    fn test_check_out_with_explicit_duration() {
        let fx = setup();

        let result = fx
            .service
            .check_out_book(
                CheckOutBookCommand::new(fx.book_id).with_duration(21),
                &member(fx.member_id),
            )
            .unwrap();

        let loan = fx.service.get_loan(result.loan_id).unwrap();
        assert_eq!(loan.due_date() - loan.loan_date(), Duration::days(21));
    }

    #[test]
    fn test_check_out_rejects_bad_duration() {
        let fx = setup();

        let result = fx.service.check_out_book(
            CheckOutBookCommand::new(fx.book_id).with_duration(45),
            &member(fx.member_id),
        );

        assert!(matches!(
            result,
            Err(ServiceError::Domain(DomainError::InvalidLoanDuration { .. }))
        ));
        assert!(fx.loans.is_empty());
    }

    #[test]
    fn test_check_out_unknown_book() {
        let fx = setup();
        let missing = Uuid::new_v4();

        let result = fx
            .service
            .check_out_book(CheckOutBookCommand::new(missing), &member(fx.member_id));

        assert!(matches!(result, Err(ServiceError::BookNotFound(id)) if id == missing));
    }

    #[test]
    fn test_check_out_occupied_book() {
        let fx = setup();
        fx.service
            .check_out_book(CheckOutBookCommand::new(fx.book_id), &member(fx.member_id))
            .unwrap();

        let result = fx
            .service
            .check_out_book(CheckOutBookCommand::new(fx.book_id), &librarian());

        assert!(matches!(result, Err(ServiceError::BookAlreadyOnLoan(id)) if id == fx.book_id));
        assert_eq!(fx.loans.len(), 1);
    }

    #[test]
    fn test_returned_book_can_go_out_again() {
        let fx = setup();
        let first = fx
            .service
            .check_out_book(CheckOutBookCommand::new(fx.book_id), &member(fx.member_id))
            .unwrap();
        fx.service.return_book(first.loan_id).unwrap();

        let second = fx
            .service
            .check_out_book(CheckOutBookCommand::new(fx.book_id), &member(fx.member_id));

        assert!(second.is_ok());
        assert_eq!(fx.loans.len(), 2);
    }

    #[test]
    fn test_member_cannot_check_out_for_someone_else() {
        let fx = setup();
        let other = Uuid::new_v4();

        let result = fx.service.check_out_book(
            CheckOutBookCommand::new(fx.book_id).with_borrower(other),
            &member(fx.member_id),
        );

        assert!(matches!(
            result,
            Err(ServiceError::Domain(DomainError::BorrowerNotPermitted))
        ));
    }

    #[test]
    fn test_librarian_checks_out_for_member() {
        let fx = setup();

        let result = fx
            .service
            .check_out_book(
                CheckOutBookCommand::new(fx.book_id).with_borrower(fx.member_id),
                &librarian(),
            )
            .unwrap();

        assert_eq!(result.borrower_id, fx.member_id);
    }

    #[test]
    fn test_check_out_unknown_borrower() {
        let fx = setup();
        let stranger = Uuid::new_v4();

        let result = fx.service.check_out_book(
            CheckOutBookCommand::new(fx.book_id).with_borrower(stranger),
            &librarian(),
        );

        assert!(matches!(result, Err(ServiceError::BorrowerNotFound(id)) if id == stranger));
    }

    #[test]
    fn test_anonymous_actor_rejected() {
        let fx = setup();

        let result = fx
            .service
            .check_out_book(CheckOutBookCommand::new(fx.book_id), &Actor::anonymous());

        assert!(matches!(
            result,
            Err(ServiceError::Domain(DomainError::MissingIdentity))
        ));
    }

    #[test]
    fn test_extend_due_date() {
        let fx = setup();
        let receipt = fx
            .service
            .check_out_book(CheckOutBookCommand::new(fx.book_id), &member(fx.member_id))
            .unwrap();

        let events = fx.service.extend_due_date(receipt.loan_id, 7).unwrap();

        assert!(matches!(events[0], LoanEvent::DueDateExtended { additional_days: 7, .. }));
        let loan = fx.service.get_loan(receipt.loan_id).unwrap();
        assert_eq!(loan.due_date(), receipt.due_date + Duration::days(7));
    }

    #[test]
    fn test_operations_on_unknown_loan() {
        let fx = setup();
        let missing = Uuid::new_v4();

        assert!(matches!(
            fx.service.return_book(missing),
            Err(ServiceError::LoanNotFound(_))
        ));
        assert!(matches!(
            fx.service.extend_due_date(missing, 7),
            Err(ServiceError::LoanNotFound(_))
        ));
        assert!(matches!(
            fx.service.get_loan(missing),
            Err(ServiceError::LoanNotFound(_))
        ));
    }

    #[test]
    fn test_damage_then_return_then_pay_completes() {
        let fx = setup();
        let receipt = fx
            .service
            .check_out_book(CheckOutBookCommand::new(fx.book_id), &member(fx.member_id))
            .unwrap();

        let events = fx
            .service
            .report_damage(receipt.loan_id, "Torn cover".to_string(), eur(Decimal::new(500, 2)))
            .unwrap();
        let fine_id = match events[0] {
            LoanEvent::FineIssued { fine_id, .. } => fine_id,
            ref other => panic!("expected FineIssued, got {:?}", other),
        };

        // Comes back on time, but the damage fine keeps it open.
        fx.service.return_book(receipt.loan_id).unwrap();
        let loan = fx.service.get_loan(receipt.loan_id).unwrap();
        assert_eq!(*loan.status(), LoanStatus::Returned);

        let events = fx
            .service
            .pay_fine(receipt.loan_id, fine_id, "TX-9".to_string())
            .unwrap();

        assert!(matches!(events[0], LoanEvent::FinePaid { .. }));
        assert!(matches!(events[1], LoanEvent::LoanCompleted { .. }));
        assert!(fx.service.get_loan(receipt.loan_id).unwrap().is_completed());
    }

    #[test]
    fn test_waive_fine_through_service() {
        let fx = setup();
        let receipt = fx
            .service
            .check_out_book(CheckOutBookCommand::new(fx.book_id), &member(fx.member_id))
            .unwrap();
        fx.service
            .report_damage(receipt.loan_id, "Coffee stains".to_string(), eur(Decimal::TEN))
            .unwrap();
        fx.service.return_book(receipt.loan_id).unwrap();

        let loan = fx.service.get_loan(receipt.loan_id).unwrap();
        let fine_id = loan.fines()[0].id();

        fx.service
            .waive_fine(receipt.loan_id, fine_id, "shelf wear".to_string())
            .unwrap();

        assert!(fx.service.get_loan(receipt.loan_id).unwrap().is_completed());
    }

    #[test]
    fn test_mark_as_lost_through_service() {
        let fx = setup();
        let receipt = fx
            .service
            .check_out_book(CheckOutBookCommand::new(fx.book_id), &member(fx.member_id))
            .unwrap();

        let events = fx.service.mark_as_lost(receipt.loan_id, None).unwrap();

        assert!(matches!(events[0], LoanEvent::LoanMarkedLost { .. }));
        assert!(matches!(events[1], LoanEvent::FineIssued { .. }));

        let loan = fx.service.get_loan(receipt.loan_id).unwrap();
        assert_eq!(*loan.status(), LoanStatus::Lost);
        assert_eq!(loan.fines()[0].amount().amount(), Decimal::new(2000, 2));

        // The book is free for a new loan once written off.
        let next = fx
            .service
            .check_out_book(CheckOutBookCommand::new(fx.book_id), &member(fx.member_id));
        assert!(next.is_ok());
    }
}
